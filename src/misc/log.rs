/*!
Miscellaneous items related to [logging](log).

Calls to the log macro are made throughout the solver. These are intended to
help diagnose why a particular constraint set failed (or succeeded) to
solve.

Note, no log implementation is provided. For more details, see [log].
*/

/// Targets to be used within a [log]! macro, one per solving phase.
pub mod targets {
    /// Logs related to [decomposition](crate::structures::constraint::decompose)
    pub const DECOMPOSE: &str = "decompose";

    /// Logs related to the [simplifier](crate::simplify)
    pub const SIMPLIFY: &str = "simplify";

    /// Logs related to the [skolem check](crate::skolem)
    pub const SKOLEM_CHECK: &str = "skolem_check";

    /// Logs related to [cycle elimination](crate::cycle)
    pub const CYCLE_ELIM: &str = "cycle_elim";

    /// Logs related to the [graph solver](crate::graph_solver)
    pub const GRAPH_SOLVE: &str = "graph_solve";

    /// Logs related to the [top-level driver](crate::driver)
    pub const DRIVER: &str = "driver";
}
