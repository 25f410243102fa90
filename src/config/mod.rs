/*!
Configuration of a solve.

A couple of points in the solving pipeline are genuinely open policy
decisions rather than forced choices (see `DESIGN.md` for the reasoning
behind each default). [Config] is where those policies live: a plain
struct of a handful of fields threaded by value into the entry point,
not a global.
*/

/// Which bound to prefer when both a lower and an upper bound are available
/// for a variable during graph solving, and the bounds disagree on which is
/// "simpler" (see [crate::graph_solver]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// Prefer the lower bound: "simpler types win". This is the documented
    /// default and matches the reference behavior relied on by existing
    /// tests.
    Lower,

    /// Prefer the upper bound.
    Upper,
}

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::Lower
    }
}

/// Top-level solver configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Which bound the graph solver prefers when a variable has both base
    /// predecessors and base successors.
    pub subtype_tiebreak: TieBreak,

    /// Override the initial fresh-variable counter instead of deriving it
    /// from the constraint's free variables. Mainly useful to pin down
    /// variable names in tests; callers embedding the solver in a
    /// typechecker should leave this `None`.
    pub fresh_counter_seed: Option<u32>,
}

impl Config {
    pub fn with_tiebreak(tiebreak: TieBreak) -> Self {
        Config {
            subtype_tiebreak: tiebreak,
            ..Config::default()
        }
    }
}
