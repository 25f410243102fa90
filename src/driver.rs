/*!
The top-level driver: tries each alternative produced by decomposition in
order, running one alternative through weak unification, simplification,
graph construction, the skolem check, cycle elimination, and the graph
solver, composing the resulting substitutions together.
*/

use std::collections::BTreeSet;

use log::{info, trace};

use crate::config::Config;
use crate::cycle::eliminate_cycles;
use crate::generic::{FreshGen, Substitution};
use crate::graph::ConstraintGraph;
use crate::graph_solver::solve_graph;
use crate::misc::log::targets;
use crate::simplify::simplify;
use crate::skolem::skolem_check;
use crate::structures::constraint::{self, Constraint};
use crate::structures::simple::SimpleConstraint;
use crate::structures::sort::SortMap;
use crate::types::err::SolveError;
use crate::types::{Type, TypeSynonyms, UAtom, VarName};
use crate::unify::weak_unify;

/// `solve_constraint(defs, c)`: decompose into alternatives and try each in
/// turn, returning the first success, or the first alternative's error if
/// every alternative fails.
pub fn solve_constraint(defs: &TypeSynonyms, c: &Constraint, config: &Config) -> Result<Substitution, SolveError> {
    let mut free = Vec::new();
    constraint::free_unif_vars(c, &mut free);
    let mut fresh = seed_fresh(config, free);

    let alternatives = constraint::decompose(c, &mut fresh)?;
    trace!(target: targets::DRIVER, "{} alternative(s) after decomposition", alternatives.len());

    let mut first_err: Option<SolveError> = None;
    for (sort_map, simples) in alternatives {
        match solve_alternative(defs, sort_map, simples, config) {
            Ok(subst) => return Ok(subst),
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }

    Err(first_err.unwrap_or(SolveError::NoUnify))
}

/// Run one decomposed alternative through the full pipeline: weak unify
/// (termination check only), simplify, build the constraint graph, skolem
/// check, cycle elimination, graph solve — composing the substitutions each
/// phase produces as `σ_sol ∘ σ_cyc ∘ σ_skolem ∘ σ_simp`.
///
/// Each alternative starts from its own inputs with no state carried over
/// from a sibling alternative that failed: the fresh-name counter entering
/// the simplifier is derived afresh from this alternative's own constraints
/// and sort map, per the concurrency model's "no memoisation across `Or`
/// alternatives".
pub fn solve_alternative(
    defs: &TypeSynonyms,
    sort_map: SortMap,
    simples: Vec<SimpleConstraint>,
    config: &Config,
) -> Result<Substitution, SolveError> {
    weak_unify(defs, &simples)?;

    let names = names_in_scope(&simples, &sort_map);
    let mut fresh = seed_fresh(config, names);

    let simplified = simplify(defs, sort_map, simples, &mut fresh)?;
    trace!(target: targets::DRIVER, "simplified to {} atomic constraint(s)", simplified.atomic.len());

    let mut graph = build_graph(&simplified.atomic);
    let mut sort_map = simplified.sort_map;

    let sigma_skolem = skolem_check(&mut graph, &mut sort_map)?;
    let sigma_cyc = eliminate_cycles(&mut graph, &sort_map)?;
    let sigma_sol = solve_graph(&graph, sort_map, config)?;

    let step1 = Substitution::compose(&sigma_skolem, &simplified.substitution);
    let step2 = Substitution::compose(&sigma_cyc, &step1);
    let total = Substitution::compose(&sigma_sol, &step2);

    info!(target: targets::DRIVER, "alternative solved: {total}");
    Ok(total)
}

fn seed_fresh(config: &Config, names: impl IntoIterator<Item = VarName>) -> FreshGen {
    match config.fresh_counter_seed {
        Some(seed) => FreshGen::starting_at(seed),
        None => FreshGen::seeded_from(names),
    }
}

/// Every variable name occurring in `simples` or `sort_map`'s domain,
/// regardless of unification/skolem kind — the seed set `max(fv(cs) ∪
/// dom(sortMap)) + 1` is drawn from.
fn names_in_scope(simples: &[SimpleConstraint], sort_map: &SortMap) -> BTreeSet<VarName> {
    fn collect(t: &Type, out: &mut BTreeSet<VarName>) {
        match t {
            Type::Atom(UAtom::Var(v)) => {
                out.insert(v.name);
            }
            Type::Atom(UAtom::Base(_)) => {}
            Type::Con(_, args) => args.iter().for_each(|a| collect(a, out)),
            Type::Syn(_) => {}
        }
    }

    let mut names = BTreeSet::new();
    for c in simples {
        let (l, r) = c.sides();
        collect(l, &mut names);
        collect(r, &mut names);
    }
    names.extend(sort_map.keys().copied());
    names
}

fn build_graph(atomic: &[SimpleConstraint]) -> ConstraintGraph {
    let mut nodes = BTreeSet::new();
    let mut edges = Vec::new();
    for c in atomic {
        if let SimpleConstraint::Sub(a, b) = c {
            let ua = a.as_atom().expect("simplifier leaves only atomic subtype constraints");
            let ub = b.as_atom().expect("simplifier leaves only atomic subtype constraints");
            nodes.insert(ua);
            nodes.insert(ub);
            edges.push((ua, ub));
        }
    }
    ConstraintGraph::mk_graph(nodes, edges)
}

/// The public entry point: solve a constraint tree against a set of type
/// synonyms, returning the substitution that satisfies it or the first
/// error encountered.
pub fn solve(type_synonyms: &TypeSynonyms, constraint: &Constraint, config: &Config) -> Result<Substitution, SolveError> {
    solve_constraint(type_synonyms, constraint, config)
}
