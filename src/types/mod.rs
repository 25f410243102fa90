/*!
The type language: atoms, constructed types, type synonyms, and the static
tables (arity, variance, the base-type subtype order) that govern them.

Everything in this module is plain data plus pure functions over it — no
solver state lives here. The solver state (substitutions, sort maps,
workspaces) lives in [crate::generic] and the per-phase modules that consume
it ([crate::simplify], [crate::graph], [crate::graph_solver]).
*/

pub mod err;

use std::collections::BTreeMap;
use std::fmt;

/// A source-level name: a type variable, a type synonym, or similar.
pub type Name = String;

/// The name of a type variable, distinct from a surface [Name] once elaborated.
///
/// Kept as a newtype (rather than a bare `u32`) so variable identity can't be
/// accidentally confused with an atom count or a vector index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarName(pub u32);

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Whether a variable atom is free to be refined by substitution, or rigid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarKind {
    /// A unification variable: solvable, may be refined by substitution.
    Unif,

    /// A skolem variable, introduced by opening a universal quantifier.
    /// Rigid: must never be unified with a base type or another skolem.
    Skolem,
}

/// A type variable together with the kind that governs how it may be solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarAtom {
    pub name: VarName,
    pub kind: VarKind,
}

impl VarAtom {
    pub fn unif(name: VarName) -> Self {
        VarAtom {
            name,
            kind: VarKind::Unif,
        }
    }

    pub fn skolem(name: VarName) -> Self {
        VarAtom {
            name,
            kind: VarKind::Skolem,
        }
    }

    pub fn is_skolem(&self) -> bool {
        matches!(self.kind, VarKind::Skolem)
    }
}

impl fmt::Display for VarAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VarKind::Unif => write!(f, "{}", self.name),
            VarKind::Skolem => write!(f, "${}", self.name),
        }
    }
}

/// The fixed enumeration of concrete base types, ordered by the declared
/// subtype relation `≤ᵦ` (see [crate::structures::sort::base_leq]).
///
/// `Ord` is derived for convenience (e.g. to put base types in a `BTreeSet`),
/// but the subtype relation used by the solver is the explicit table in
/// [crate::structures::sort], not derived `Ord` — `Bool`, `Unit`, and `Char`
/// are incomparable with the numeric tower despite having a derived order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseType {
    Nat,
    Int,
    Rational,
    Real,
    Bool,
    Unit,
    Char,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseType::Nat => "Nat",
            BaseType::Int => "Int",
            BaseType::Rational => "Rational",
            BaseType::Real => "Real",
            BaseType::Bool => "Bool",
            BaseType::Unit => "Unit",
            BaseType::Char => "Char",
        };
        write!(f, "{s}")
    }
}

/// An atom: a leaf of the type language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UAtom {
    Base(BaseType),
    Var(VarAtom),
}

impl UAtom {
    pub fn as_var(&self) -> Option<VarAtom> {
        match self {
            UAtom::Var(v) => Some(*v),
            UAtom::Base(_) => None,
        }
    }

    pub fn as_base(&self) -> Option<BaseType> {
        match self {
            UAtom::Base(b) => Some(*b),
            UAtom::Var(_) => None,
        }
    }

    pub fn is_skolem(&self) -> bool {
        matches!(self, UAtom::Var(v) if v.is_skolem())
    }
}

impl fmt::Display for UAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UAtom::Base(b) => write!(f, "{b}"),
            UAtom::Var(v) => write!(f, "{v}"),
        }
    }
}

/// The fixed set of non-synonym type constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TyCon {
    Arrow,
    Pair,
    Sum,
    List,
}

impl fmt::Display for TyCon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TyCon::Arrow => "->",
            TyCon::Pair => "Pair",
            TyCon::Sum => "Sum",
            TyCon::List => "List",
        };
        write!(f, "{s}")
    }
}

/// Variance of a constructor argument position: whether subtyping on that
/// position propagates in the same direction as the containing type
/// (`Covariant`) or the opposite direction (`Contravariant`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variance {
    Covariant,
    Contravariant,
}

/// The per-argument variance of a constructor, in argument order.
///
/// `arrow` is contravariant in its domain and covariant in its range; every
/// other current constructor is covariant in all arguments.
pub fn arity(con: TyCon) -> &'static [Variance] {
    use Variance::*;
    match con {
        TyCon::Arrow => &[Contravariant, Covariant],
        TyCon::Pair => &[Covariant, Covariant],
        TyCon::Sum => &[Covariant, Covariant],
        TyCon::List => &[Covariant],
    }
}

/// A type: an atom, a constructor application, or a reference to a type
/// synonym awaiting expansion.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Atom(UAtom),
    Con(TyCon, Vec<Type>),
    Syn(Name),
}

impl Type {
    pub fn base(b: BaseType) -> Self {
        Type::Atom(UAtom::Base(b))
    }

    pub fn unif(name: VarName) -> Self {
        Type::Atom(UAtom::Var(VarAtom::unif(name)))
    }

    pub fn skolem(name: VarName) -> Self {
        Type::Atom(UAtom::Var(VarAtom::skolem(name)))
    }

    pub fn arrow(from: Type, to: Type) -> Self {
        Type::Con(TyCon::Arrow, vec![from, to])
    }

    pub fn as_atom(&self) -> Option<UAtom> {
        match self {
            Type::Atom(a) => Some(*a),
            _ => None,
        }
    }

    /// Free unification-variable names occurring in this type.
    pub fn free_unif_vars(&self, out: &mut Vec<VarName>) {
        match self {
            Type::Atom(UAtom::Var(v)) if matches!(v.kind, VarKind::Unif) => out.push(v.name),
            Type::Atom(_) => {}
            Type::Con(_, args) => {
                for a in args {
                    a.free_unif_vars(out);
                }
            }
            Type::Syn(_) => {}
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Atom(a) => write!(f, "{a}"),
            Type::Con(con, args) => {
                write!(f, "{con}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Type::Syn(name) => write!(f, "{name}"),
        }
    }
}

/// The table of user-declared type synonyms, mapping each name to its
/// (non-recursive) expansion.
pub type TypeSynonyms = BTreeMap<Name, Type>;

/// Look up a type synonym, or fail with [err::SolveError::Unknown].
pub fn expand_synonym(defs: &TypeSynonyms, name: &str) -> Result<Type, err::SolveError> {
    defs.get(name)
        .cloned()
        .ok_or_else(|| err::SolveError::Unknown(name.to_string()))
}
