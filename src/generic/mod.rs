/*!
Reusable pieces of solver-internal machinery that aren't specific to types,
sorts, or the constraint grammar: substitutions and deterministic fresh-name
generation. Nothing here depends on the rest of the crate beyond
[crate::types].
*/

pub mod fresh;
pub mod subst;

pub use fresh::FreshGen;
pub use subst::Substitution;
