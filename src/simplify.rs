/*!
The simplifier: repeatedly reduces a set of simple constraints until only
atomic subtype constraints remain, threading a live substitution and sort
map throughout.

Termination relies on [crate::unify::weak_unify] having already certified
the subtyping problem is finite (see [crate::driver::solve_alternative]) and
on the `seen` set preventing an identical constraint from being reprocessed.
*/

use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::generic::{FreshGen, Substitution};
use crate::misc::log::targets;
use crate::structures::simple::SimpleConstraint;
use crate::structures::sort::{decompose_qual, union_sort_maps, SortMap};
use crate::types::err::SolveError;
use crate::types::{arity, expand_synonym, Type, TypeSynonyms, UAtom, VarKind, Variance};

/// What the simplifier produces: the residual atomic subtype constraints
/// (ready for the constraint graph), together with the sort map and
/// substitution accumulated along the way.
#[derive(Clone, Debug)]
pub struct SimplifyResult {
    pub sort_map: SortMap,
    pub substitution: Substitution,
    pub atomic: Vec<SimpleConstraint>,
}

/// Run the simplifier to completion on one alternative's constraints.
pub fn simplify(
    defs: &TypeSynonyms,
    mut sort_map: SortMap,
    constraints: Vec<SimpleConstraint>,
    fresh: &mut FreshGen,
) -> Result<SimplifyResult, SolveError> {
    let mut pending: VecDeque<SimpleConstraint> = constraints.into_iter().collect();
    let mut subst = Substitution::empty();
    let mut seen: HashSet<SimpleConstraint> = HashSet::new();

    while let Some(idx) = pending.iter().position(is_simplifiable) {
        let c = pending.remove(idx).expect("index just found by position");
        if seen.contains(&c) {
            continue;
        }
        trace!(target: targets::SIMPLIFY, "simplifying {c}");
        seen.insert(c.clone());
        apply_rule(defs, fresh, c, &mut pending, &mut subst, &mut sort_map)?;
    }

    let atomic: Vec<SimpleConstraint> = pending.into_iter().collect();
    debug_assert!(
        atomic.iter().all(|c| matches!(c, SimpleConstraint::Sub(_, _)) && c.is_atomic()),
        "simplifier must leave only atomic subtype constraints"
    );

    Ok(SimplifyResult {
        sort_map,
        substitution: subst,
        atomic,
    })
}

/// Whether `c` matches one of the reducible shapes: an equality, a
/// constructor on at least one side, a type synonym on either side, or
/// base-vs-base subtyping.
fn is_simplifiable(c: &SimpleConstraint) -> bool {
    match c {
        SimpleConstraint::Eq(_, _) => true,
        SimpleConstraint::Sub(a, b) => {
            if matches!(a, Type::Syn(_)) || matches!(b, Type::Syn(_)) {
                return true;
            }
            matches!(
                (a, b),
                (Type::Con(_, _), Type::Con(_, _))
                    | (Type::Atom(_), Type::Con(_, _))
                    | (Type::Con(_, _), Type::Atom(_))
                    | (Type::Atom(UAtom::Base(_)), Type::Atom(UAtom::Base(_)))
            )
        }
    }
}

fn apply_rule(
    defs: &TypeSynonyms,
    fresh: &mut FreshGen,
    c: SimpleConstraint,
    pending: &mut VecDeque<SimpleConstraint>,
    subst: &mut Substitution,
    sort_map: &mut SortMap,
) -> Result<(), SolveError> {
    match c {
        SimpleConstraint::Eq(a, b) => {
            let sigma = crate::unify::unify(defs, vec![(a, b)])?;
            extend_subst(sigma, pending, subst, sort_map)
        }
        SimpleConstraint::Sub(a, b) => apply_sub_rule(defs, fresh, a, b, pending, subst, sort_map),
    }
}

fn apply_sub_rule(
    defs: &TypeSynonyms,
    fresh: &mut FreshGen,
    a: Type,
    b: Type,
    pending: &mut VecDeque<SimpleConstraint>,
    subst: &mut Substitution,
    sort_map: &mut SortMap,
) -> Result<(), SolveError> {
    match (&a, &b) {
        (Type::Syn(name), _) => {
            let expanded = expand_synonym(defs, name)?;
            pending.push_back(SimpleConstraint::Sub(expanded, b));
            Ok(())
        }
        (_, Type::Syn(name)) => {
            let expanded = expand_synonym(defs, name)?;
            pending.push_back(SimpleConstraint::Sub(a, expanded));
            Ok(())
        }
        (Type::Con(c1, ts), Type::Con(c2, us)) => {
            if c1 != c2 || ts.len() != us.len() {
                return Err(SolveError::NoUnify);
            }
            let variances = arity(*c1);
            for ((t, u), variance) in ts.iter().zip(us.iter()).zip(variances.iter()) {
                let oriented = match variance {
                    Variance::Covariant => SimpleConstraint::Sub(t.clone(), u.clone()),
                    Variance::Contravariant => SimpleConstraint::Sub(u.clone(), t.clone()),
                };
                pending.push_back(oriented);
            }
            Ok(())
        }
        (Type::Atom(atom), Type::Con(con, _)) => match atom {
            UAtom::Var(v) if matches!(v.kind, VarKind::Unif) => {
                let con = *con;
                let fresh_args: Vec<Type> = arity(con).iter().map(|_| Type::unif(fresh.fresh())).collect();
                let sigma = Substitution::singleton(v.name, Type::Con(con, fresh_args));
                pending.push_back(SimpleConstraint::Sub(a, b));
                extend_subst(sigma, pending, subst, sort_map)
            }
            _ => Err(SolveError::NoUnify),
        },
        (Type::Con(con, _), Type::Atom(atom)) => match atom {
            UAtom::Var(v) if matches!(v.kind, VarKind::Unif) => {
                let con = *con;
                let fresh_args: Vec<Type> = arity(con).iter().map(|_| Type::unif(fresh.fresh())).collect();
                let sigma = Substitution::singleton(v.name, Type::Con(con, fresh_args));
                pending.push_back(SimpleConstraint::Sub(a, b));
                extend_subst(sigma, pending, subst, sort_map)
            }
            _ => Err(SolveError::NoUnify),
        },
        (Type::Atom(UAtom::Base(b1)), Type::Atom(UAtom::Base(b2))) => {
            if crate::structures::sort::base_leq(*b1, *b2) {
                Ok(())
            } else {
                Err(SolveError::NoUnify)
            }
        }
        _ => unreachable!("non-simplifiable constraint selected by is_simplifiable"),
    }
}

/// `extendSubst(σ')`: compose the new substitution into the running one,
/// apply it to every pending constraint, and propagate it through the sort
/// map.
fn extend_subst(
    sigma: Substitution,
    pending: &mut VecDeque<SimpleConstraint>,
    subst: &mut Substitution,
    sort_map: &mut SortMap,
) -> Result<(), SolveError> {
    // Propagate the sort map first: if `sigma` binds a sorted variable to
    // something that can't carry its sort, `decompose_qual` raises the
    // precisely-qualified error before anything else is mutated.
    let mut removed = Vec::new();
    for (v, t) in sigma.iter() {
        if let Some(s) = sort_map.get(&v).cloned() {
            let mut propagated = SortMap::new();
            for q in s {
                let sub_sm = decompose_qual(t, q)?;
                propagated = union_sort_maps(propagated, sub_sm);
            }
            removed.push((v, propagated));
        }
    }
    for (v, propagated) in removed {
        sort_map.remove(&v);
        *sort_map = union_sort_maps(std::mem::take(sort_map), propagated);
    }

    *subst = Substitution::compose(&sigma, subst);

    for c in pending.iter_mut() {
        *c = match c {
            SimpleConstraint::Eq(x, y) => SimpleConstraint::Eq(sigma.apply(x), sigma.apply(y)),
            SimpleConstraint::Sub(x, y) => SimpleConstraint::Sub(sigma.apply(x), sigma.apply(y)),
        };
    }

    Ok(())
}
