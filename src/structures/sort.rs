/*!
Sorts, qualifiers, and the base-type subtype lattice.

A [Sort] is the "interface" a type variable's eventual binding must satisfy —
a set of [Qualifier]s. The base-type subtype order `≤ᵦ` and its associated
`lub`/`glb`/`dir_types` operations are declared here as plain tables: facts
fixed by the theory, not runtime-tunable state.
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::err::QualifierError;
use crate::types::{BaseType, TyCon, Type, UAtom, VarKind, VarName};

/// An atomic predicate a type may or may not satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qualifier {
    Num,
    Sub,
    Finite,
    Bool,
    Enum,
    Container,
    Ord,
}

/// A set of qualifiers. The empty set is the top sort (no requirement).
pub type Sort = BTreeSet<Qualifier>;

/// Maps unification-variable names to the sort they must inhabit.
/// A name with no entry defaults to the top sort.
pub type SortMap = BTreeMap<VarName, Sort>;

/// The sort recorded for `name`, defaulting to the top (empty) sort.
pub fn sort_of(map: &SortMap, name: VarName) -> Sort {
    map.get(&name).cloned().unwrap_or_default()
}

/// Union two sort maps, unioning the qualifier sets of any key present in
/// both.
pub fn union_sort_maps(a: SortMap, b: SortMap) -> SortMap {
    let mut out = a;
    for (k, qs) in b {
        out.entry(k).or_default().extend(qs);
    }
    out
}

/// Direction of the base-type subtype order: either the direction of
/// supertypes or the direction of subtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Super,
    Sub,
}

impl Dir {
    pub fn flip(self) -> Dir {
        match self {
            Dir::Super => Dir::Sub,
            Dir::Sub => Dir::Super,
        }
    }
}

/// The fixed numeric tower, ordered from most to least specific.
const NUMERIC_TOWER: &[BaseType] = &[
    BaseType::Nat,
    BaseType::Int,
    BaseType::Rational,
    BaseType::Real,
];

/// `b1 ≤ᵦ b2`: the declared base-type subtype relation.
///
/// The numeric tower `Nat ≤ Int ≤ Rational ≤ Real` is totally ordered;
/// `Bool`, `Unit`, and `Char` are incomparable with the tower and with each
/// other (other than reflexively).
pub fn base_leq(b1: BaseType, b2: BaseType) -> bool {
    if b1 == b2 {
        return true;
    }
    match (NUMERIC_TOWER.iter().position(|b| *b == b1), NUMERIC_TOWER.iter().position(|b| *b == b2)) {
        (Some(i), Some(j)) => i <= j,
        _ => false,
    }
}

/// The least upper bound of two base types, if one exists.
pub fn ty_lub(b1: BaseType, b2: BaseType) -> Option<BaseType> {
    if base_leq(b1, b2) {
        Some(b2)
    } else if base_leq(b2, b1) {
        Some(b1)
    } else {
        None
    }
}

/// The greatest lower bound of two base types, if one exists.
pub fn ty_glb(b1: BaseType, b2: BaseType) -> Option<BaseType> {
    if base_leq(b1, b2) {
        Some(b1)
    } else if base_leq(b2, b1) {
        Some(b2)
    } else {
        None
    }
}

/// All base types related to `b` in direction `dir`: supertypes if
/// `dir = Super`, subtypes if `dir = Sub` (`b` itself is always included,
/// since `≤ᵦ` is reflexive).
pub fn dir_types(dir: Dir, b: BaseType) -> Vec<BaseType> {
    match NUMERIC_TOWER.iter().position(|x| *x == b) {
        None => vec![b],
        Some(i) => match dir {
            Dir::Super => NUMERIC_TOWER[i..].to_vec(),
            Dir::Sub => NUMERIC_TOWER[..=i].to_vec(),
        },
    }
}

/// Whether a base type satisfies a single qualifier.
pub fn has_qual(b: BaseType, q: Qualifier) -> bool {
    match q {
        Qualifier::Num => matches!(
            b,
            BaseType::Nat | BaseType::Int | BaseType::Rational | BaseType::Real
        ),
        Qualifier::Sub => matches!(
            b,
            BaseType::Int | BaseType::Rational | BaseType::Real
        ),
        Qualifier::Finite => !matches!(b, BaseType::Rational | BaseType::Real),
        Qualifier::Bool => matches!(b, BaseType::Bool),
        Qualifier::Enum => matches!(b, BaseType::Bool | BaseType::Unit | BaseType::Char),
        Qualifier::Container => false,
        Qualifier::Ord => true,
    }
}

/// Whether a base type satisfies every qualifier in a sort.
pub fn has_sort(b: BaseType, s: &Sort) -> bool {
    s.iter().all(|q| has_qual(b, *q))
}

/// A canonical inhabitant of a sort, used when a variable carries a
/// nontrivial sort but is under neither subtype nor supertype pressure.
///
/// Picks the "simplest" (lowest in the numeric tower, or otherwise first
/// matching) base type inhabiting the sort.
pub fn pick_sort_base(s: &Sort) -> Option<BaseType> {
    const CANDIDATES: &[BaseType] = &[
        BaseType::Nat,
        BaseType::Int,
        BaseType::Rational,
        BaseType::Real,
        BaseType::Bool,
        BaseType::Unit,
        BaseType::Char,
    ];
    CANDIDATES.iter().copied().find(|b| has_sort(*b, s))
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Qualifier::Num => "num",
            Qualifier::Sub => "sub",
            Qualifier::Finite => "finite",
            Qualifier::Bool => "bool",
            Qualifier::Enum => "enum",
            Qualifier::Container => "container",
            Qualifier::Ord => "ord",
        };
        write!(f, "{s}")
    }
}

/// `qual_rules[C][q]`: the per-argument qualifier requirement imposed on a
/// constructor's arguments by a qualifier on the constructed type, or `None`
/// if the qualifier cannot hold of that constructor at all.
///
/// Each element of the returned slice is `Some(q')` when the corresponding
/// argument must itself satisfy `q'`, or `None` when no further requirement
/// is imposed on that argument.
pub fn qual_rule(con: TyCon, q: Qualifier) -> Option<&'static [Option<Qualifier>]> {
    use Qualifier::*;
    use TyCon::*;
    match (con, q) {
        (List, Container) => Some(&[None]),
        (List, Finite) => Some(&[Some(Finite)]),
        (Pair, Container) => Some(&[None, None]),
        (Sum, Container) => Some(&[None, None]),
        (Pair, Finite) => Some(&[Some(Finite), Some(Finite)]),
        (Sum, Finite) => Some(&[Some(Finite), Some(Finite)]),
        _ => None,
    }
}

/// Decide what a qualifier requires of an atom, producing the resulting
/// single-entry (or empty) sort map.
pub fn decompose_qual_atom(a: UAtom, q: Qualifier) -> Result<SortMap, QualifierError> {
    match a {
        UAtom::Var(v) if matches!(v.kind, VarKind::Unif) => {
            let mut map = SortMap::new();
            map.entry(v.name).or_default().insert(q);
            Ok(map)
        }
        UAtom::Var(v) => Err(QualifierError::QualSkolem(q, v.name)),
        UAtom::Base(b) => {
            if has_qual(b, q) {
                Ok(SortMap::new())
            } else {
                Err(QualifierError::UnqualBase(q, b))
            }
        }
    }
}

/// Recursively decide what a qualifier requires of a whole type, by
/// structural decomposition through constructors down to [decompose_qual_atom].
pub fn decompose_qual(t: &Type, q: Qualifier) -> Result<SortMap, QualifierError> {
    match t {
        Type::Atom(a) => decompose_qual_atom(*a, q),
        Type::Con(con, args) => match qual_rule(*con, q) {
            None => Err(QualifierError::Unqual(q, t.clone())),
            Some(reqs) => {
                let mut acc = SortMap::new();
                for (arg, req) in args.iter().zip(reqs.iter()) {
                    if let Some(req_q) = req {
                        let sub = decompose_qual(arg, *req_q)?;
                        acc = union_sort_maps(acc, sub);
                    }
                }
                Ok(acc)
            }
        },
        Type::Syn(_) => Err(QualifierError::Unqual(q, t.clone())),
    }
}
