/*!
Simple constraints: the two-sided relations that survive decomposition.
*/

use std::fmt;

use crate::types::Type;

/// Either an equality or a subtyping relation between two types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleConstraint {
    Eq(Type, Type),
    Sub(Type, Type),
}

impl SimpleConstraint {
    pub fn sides(&self) -> (&Type, &Type) {
        match self {
            SimpleConstraint::Eq(a, b) => (a, b),
            SimpleConstraint::Sub(a, b) => (a, b),
        }
    }

    /// True once both sides are atoms (regardless of relation).
    pub fn is_atomic(&self) -> bool {
        let (l, r) = self.sides();
        l.as_atom().is_some() && r.as_atom().is_some()
    }
}

impl fmt::Display for SimpleConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleConstraint::Eq(a, b) => write!(f, "{a} = {b}"),
            SimpleConstraint::Sub(a, b) => write!(f, "{a} <: {b}"),
        }
    }
}
