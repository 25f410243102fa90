/*!
The constraint grammar — the input language the solver consumes — and its
decomposition into alternatives of (sort map, simple constraints).
*/

use std::collections::HashMap;
use std::fmt;

use crate::generic::FreshGen;
use crate::structures::simple::SimpleConstraint;
use crate::structures::sort::{decompose_qual, union_sort_maps, Qualifier, SortMap};
use crate::types::err::SolveError;
use crate::types::{Type, UAtom, VarAtom, VarKind, VarName};

/// The constraint language produced by the bidirectional typing rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    Sub(Type, Type),
    Eq(Type, Type),
    Qual(Qualifier, Type),
    And(Vec<Constraint>),
    Or(Vec<Constraint>),
    /// A universal quantifier; the bound variables are instantiated as fresh
    /// skolems when the constraint is decomposed.
    All(Vec<VarName>, Box<Constraint>),
    True,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Sub(a, b) => write!(f, "{a} <: {b}"),
            Constraint::Eq(a, b) => write!(f, "{a} = {b}"),
            Constraint::Qual(q, t) => write!(f, "{q}({t})"),
            Constraint::And(cs) => {
                write!(f, "And[")?;
                fmt_list(f, cs)?;
                write!(f, "]")
            }
            Constraint::Or(cs) => {
                write!(f, "Or[")?;
                fmt_list(f, cs)?;
                write!(f, "]")
            }
            Constraint::All(xs, c) => {
                write!(f, "All ")?;
                for (i, x) in xs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, ". {c}")
            }
            Constraint::True => write!(f, "True"),
        }
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, cs: &[Constraint]) -> fmt::Result {
    for (i, c) in cs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

/// One alternative surviving `decompose`: the sort requirements collected
/// from `Qual` nodes, paired with the simple (equality/subtyping)
/// constraints collected from `Sub`/`Eq` nodes.
pub type Alternative = (SortMap, Vec<SimpleConstraint>);

/// `decompose(c) → [(SortMap, [SimpleConstraint])]`.
///
/// `fresh` supplies skolem names for `All`; callers should seed it from the
/// free variables of the top-level constraint before the first call (see
/// [crate::generic::FreshGen::seeded_from]).
pub fn decompose(c: &Constraint, fresh: &mut FreshGen) -> Result<Vec<Alternative>, SolveError> {
    match c {
        Constraint::Sub(a, b) => Ok(vec![(SortMap::new(), vec![SimpleConstraint::Sub(a.clone(), b.clone())])]),
        Constraint::Eq(a, b) => Ok(vec![(SortMap::new(), vec![SimpleConstraint::Eq(a.clone(), b.clone())])]),
        Constraint::Qual(q, t) => {
            let map = decompose_qual(t, *q)?;
            Ok(vec![(map, Vec::new())])
        }
        Constraint::And(cs) => decompose_and(cs, fresh),
        Constraint::Or(cs) => decompose_or(cs, fresh),
        Constraint::All(xs, body) => decompose_all(xs, body, fresh),
        Constraint::True => Ok(vec![(SortMap::new(), Vec::new())]),
    }
}

fn decompose_and(cs: &[Constraint], fresh: &mut FreshGen) -> Result<Vec<Alternative>, SolveError> {
    let mut acc: Vec<Alternative> = vec![(SortMap::new(), Vec::new())];
    for c in cs {
        let child_alts = decompose(c, fresh)?;
        let mut next = Vec::with_capacity(acc.len() * child_alts.len());
        for (sm1, simples1) in &acc {
            for (sm2, simples2) in &child_alts {
                let merged_sm = union_sort_maps(sm1.clone(), sm2.clone());
                let mut merged_simples = simples1.clone();
                merged_simples.extend(simples2.clone());
                next.push((merged_sm, merged_simples));
            }
        }
        acc = next;
    }
    Ok(acc)
}

fn decompose_or(cs: &[Constraint], fresh: &mut FreshGen) -> Result<Vec<Alternative>, SolveError> {
    let mut alts = Vec::new();
    let mut first_err: Option<SolveError> = None;
    for c in cs {
        match decompose(c, fresh) {
            Ok(mut child_alts) => alts.append(&mut child_alts),
            Err(e) => {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    if alts.is_empty() {
        if let Some(e) = first_err {
            return Err(e);
        }
    }
    Ok(alts)
}

fn decompose_all(
    xs: &[VarName],
    body: &Constraint,
    fresh: &mut FreshGen,
) -> Result<Vec<Alternative>, SolveError> {
    let mapping: HashMap<VarName, VarName> = xs.iter().map(|x| (*x, fresh.fresh())).collect();
    let skolemized = rename_to_skolems(body, &mapping);
    decompose(&skolemized, fresh)
}

/// Replace every unification-variable occurrence named by a key of
/// `mapping` with a skolem atom bearing the mapped fresh name.
fn rename_to_skolems(c: &Constraint, mapping: &HashMap<VarName, VarName>) -> Constraint {
    match c {
        Constraint::Sub(a, b) => Constraint::Sub(rename_type(a, mapping), rename_type(b, mapping)),
        Constraint::Eq(a, b) => Constraint::Eq(rename_type(a, mapping), rename_type(b, mapping)),
        Constraint::Qual(q, t) => Constraint::Qual(*q, rename_type(t, mapping)),
        Constraint::And(cs) => Constraint::And(cs.iter().map(|c| rename_to_skolems(c, mapping)).collect()),
        Constraint::Or(cs) => Constraint::Or(cs.iter().map(|c| rename_to_skolems(c, mapping)).collect()),
        Constraint::All(xs, body) => {
            // Inner quantifiers shadow: drop any mapping entries they rebind.
            let mut inner_mapping = mapping.clone();
            for x in xs {
                inner_mapping.remove(x);
            }
            Constraint::All(xs.clone(), Box::new(rename_to_skolems(body, &inner_mapping)))
        }
        Constraint::True => Constraint::True,
    }
}

fn rename_type(t: &Type, mapping: &HashMap<VarName, VarName>) -> Type {
    match t {
        Type::Atom(UAtom::Var(v)) if matches!(v.kind, VarKind::Unif) => match mapping.get(&v.name) {
            Some(fresh_name) => Type::Atom(UAtom::Var(VarAtom::skolem(*fresh_name))),
            None => t.clone(),
        },
        Type::Atom(_) => t.clone(),
        Type::Con(con, args) => Type::Con(*con, args.iter().map(|a| rename_type(a, mapping)).collect()),
        Type::Syn(name) => Type::Syn(name.clone()),
    }
}

/// All free unification-variable names occurring (transitively) in a
/// constraint, used to seed a [FreshGen] before the first call to
/// [decompose].
pub fn free_unif_vars(c: &Constraint, out: &mut Vec<VarName>) {
    match c {
        Constraint::Sub(a, b) | Constraint::Eq(a, b) => {
            a.free_unif_vars(out);
            b.free_unif_vars(out);
        }
        Constraint::Qual(_, t) => t.free_unif_vars(out),
        Constraint::And(cs) | Constraint::Or(cs) => {
            for c in cs {
                free_unif_vars(c, out);
            }
        }
        Constraint::All(_, body) => free_unif_vars(body, out),
        Constraint::True => {}
    }
}
