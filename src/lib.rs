/*!
A library for type inference and constraint solving for the Disco teaching
language: Hindley-Milner inference extended with coercive subtyping over a
numeric base-type lattice, qualified polymorphism, and non-recursive type
synonyms.

disco_infer is the constraint-solving core sitting behind Disco's
bidirectional type checker. It does not parse, elaborate, or evaluate
anything: it consumes a [Constraint](structures::Constraint) tree already
built by an elaborator and produces a [Substitution](generic::Substitution)
satisfying it, or an error explaining why none exists.

Some guiding principles (see [below](#guiding-principles) for further
details):
- [Modularity](#modularity).
- Deterministic, single-threaded solving.
- [Simple efficiency](#simple-efficiency).

# Orientation

A solve moves through a fixed pipeline, one [Constraint](structures::Constraint)
at a time:

    Constraint -> decompose -> alternatives of (SortMap, [SimpleConstraint])
               -> (per alternative) simplify -> atomic subtype constraints
               -> build graph -> skolem check -> cycle elimination
               -> graph solve -> substitution

Useful starting points:
- [driver::solve], the single public entry point.
- [structures::constraint::decompose] to see how the input grammar collapses
  to alternatives.
- [simplify] for the state machine that reduces a set of constraints to
  atomic subtyping.
- [graph] for the constraint graph the later phases operate on.
- [config::Config] for the handful of policy knobs this crate exposes.

# Examples

+ Solve a pair of subtype constraints against one fresh variable, recovering
  its inferred type.

```rust
use disco_infer::config::Config;
use disco_infer::driver::solve;
use disco_infer::structures::Constraint;
use disco_infer::types::{BaseType, Type, TypeSynonyms, VarName};

let v = VarName(0);
let constraint = Constraint::And(vec![
    Constraint::Sub(Type::base(BaseType::Nat), Type::unif(v)),
    Constraint::Sub(Type::unif(v), Type::base(BaseType::Real)),
]);

let defs = TypeSynonyms::new();
let result = solve(&defs, &constraint, &Config::default()).unwrap();
assert_eq!(result.get(v), Some(&Type::base(BaseType::Nat)));
```

# Guiding principles

## Modularity

Each phase of the pipeline is its own module with no knowledge of the
phases around it beyond the data it consumes and produces:
[structures::constraint::decompose] is a pure function of a `Constraint`;
[simplify] owns its own workspace (sort map, substitution, seen-set) for the
duration of one alternative; [graph], [skolem], [cycle], and [graph_solver]
each operate purely on the constraint graph and sort map handed to them.
Use of external crates is limited to ones that help support this, namely
[petgraph](https://docs.rs/petgraph/latest/petgraph/) for the constraint
graph's weakly/strongly-connected-component analysis and
[log](https://docs.rs/log/latest/log/) for diagnostics.

## Simple efficiency

The solver is single-threaded, synchronous, and always terminating: every
operation is a pure function or a bounded loop over a workspace that shrinks
monotonically (the `seen` set in [simplify], the vertex count in [graph]).
Deterministic fresh-name generation and `BTreeMap`/`BTreeSet`-backed sort
maps and graphs keep output reproducible across runs, which matters for
diagnosing a backtracked `Or` alternative.

# Logs

To help diagnose why a particular constraint set failed (or succeeded) to
solve, calls to [log!](log) are made throughout. Targets are listed in
[misc::log::targets] so output can be filtered to one phase, e.g.
`RUST_LOG=simplify` with [env_logger](https://docs.rs/env_logger/latest/env_logger/).
*/

pub mod config;
pub mod cycle;
pub mod driver;
pub mod generic;
pub mod graph;
pub mod graph_solver;
pub mod misc;
pub mod simplify;
pub mod skolem;
pub mod structures;
pub mod types;
pub mod unify;

pub use config::Config;
pub use driver::solve;
pub use generic::Substitution;
pub use structures::Constraint;
pub use types::err::SolveError;
