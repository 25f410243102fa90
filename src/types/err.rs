/*!
Error types returned by the constraint solver.

- Most variants correspond directly to one named failure kind the solver
  is documented to raise.
- `SolveError` is the only error type meant to reach an external caller (e.g.
  a typechecker producing a diagnostic); payload types like [QualifierError]
  exist to keep `decompose_qual`'s failures focused without bloating the
  top-level enum with redundant fields.

As throughout the crate, `err::` is the conventional prefix when referring to
these types from elsewhere.
*/

use std::fmt;

use crate::structures::sort::Qualifier;
use crate::types::{BaseType, Type, VarName};

/// The error returned by [crate::solve] on a failed solve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The subtyping problem has no finite solution structure; an infinite
    /// type would be needed. Raised by the weak-unification termination
    /// check, before the simplifier runs.
    NoWeakUnifier,

    /// Equations or subtyping constraints are unsatisfiable over the base
    /// lattice. Raised by unification, the skolem check, cycle elimination,
    /// or the graph solver.
    NoUnify,

    /// A base type does not satisfy a required qualifier.
    UnqualBase(Qualifier, BaseType),

    /// No qualification rule exists for a constructor under a qualifier; the
    /// constraint is intrinsically impossible.
    Unqual(Qualifier, Type),

    /// A qualifier is required of a skolem variable, whose sort is fixed and
    /// cannot accommodate it.
    QualSkolem(Qualifier, VarName),

    /// Reference to an undefined type synonym.
    Unknown(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::NoWeakUnifier => {
                write!(f, "no finite unification structure for the given subtyping constraints")
            }
            SolveError::NoUnify => write!(f, "constraints are unsatisfiable"),
            SolveError::UnqualBase(q, b) => {
                write!(f, "base type {b} does not satisfy qualifier {q:?}")
            }
            SolveError::Unqual(q, t) => {
                write!(f, "no rule for qualifier {q:?} on constructed type {t}")
            }
            SolveError::QualSkolem(q, v) => {
                write!(f, "qualifier {q:?} required of rigid variable {v}")
            }
            SolveError::Unknown(name) => write!(f, "reference to undefined type synonym `{name}`"),
        }
    }
}

impl std::error::Error for SolveError {}

/// Failures raised internally while deciding qualification of a constructed
/// type ([crate::structures::sort::decompose_qual]); each is immediately
/// wrapped into the corresponding [SolveError] variant at the call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QualifierError {
    UnqualBase(Qualifier, BaseType),
    Unqual(Qualifier, Type),
    QualSkolem(Qualifier, VarName),
}

impl From<QualifierError> for SolveError {
    fn from(e: QualifierError) -> Self {
        match e {
            QualifierError::UnqualBase(q, b) => SolveError::UnqualBase(q, b),
            QualifierError::Unqual(q, t) => SolveError::Unqual(q, t),
            QualifierError::QualSkolem(q, v) => SolveError::QualSkolem(q, v),
        }
    }
}
