/*!
Key structures of the constraint language: sorts and qualifiers, the
base-type subtype lattice, and the grammar of constraints and simple
constraints that flow through the solver.
*/

pub mod constraint;
pub mod simple;
pub mod sort;

pub use constraint::Constraint;
pub use simple::SimpleConstraint;
