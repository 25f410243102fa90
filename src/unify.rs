/*!
Unification: ordinary unification, the weak unifier used only as a
termination check, and atom-level unification used to collapse strongly- or
weakly-connected components of the constraint graph.
*/

use std::collections::VecDeque;

use crate::generic::Substitution;
use crate::structures::simple::SimpleConstraint;
use crate::types::err::SolveError;
use crate::types::{expand_synonym, Type, TypeSynonyms, UAtom, VarKind, VarName};

/// Find the most general unifier of a list of type equations.
///
/// Implements the standard unification rules: base-base equality, variable
/// binding with an occurs check, constructor decomposition by matching
/// arity, type-synonym expansion, and skolem self-equality. Fails with
/// [SolveError::NoUnify] on any other pairing.
pub fn unify(defs: &TypeSynonyms, eqs: Vec<(Type, Type)>) -> Result<Substitution, SolveError> {
    let mut subst = Substitution::empty();
    let mut worklist: VecDeque<(Type, Type)> = eqs.into_iter().collect();

    while let Some((l, r)) = worklist.pop_front() {
        let l = subst.apply(&l);
        let r = subst.apply(&r);
        unify_step(defs, l, r, &mut subst, &mut worklist)?;
    }

    Ok(subst)
}

fn unify_step(
    defs: &TypeSynonyms,
    l: Type,
    r: Type,
    subst: &mut Substitution,
    worklist: &mut VecDeque<(Type, Type)>,
) -> Result<(), SolveError> {
    match (l, r) {
        (Type::Syn(name), other) => {
            let expanded = expand_synonym(defs, &name)?;
            worklist.push_back((expanded, other));
            Ok(())
        }
        (other, Type::Syn(name)) => {
            let expanded = expand_synonym(defs, &name)?;
            worklist.push_back((other, expanded));
            Ok(())
        }
        (Type::Atom(UAtom::Base(b1)), Type::Atom(UAtom::Base(b2))) => {
            if b1 == b2 {
                Ok(())
            } else {
                Err(SolveError::NoUnify)
            }
        }
        (Type::Atom(UAtom::Var(v)), t) if matches!(v.kind, VarKind::Unif) => {
            bind(v.name, t, subst, worklist)
        }
        (t, Type::Atom(UAtom::Var(v))) if matches!(v.kind, VarKind::Unif) => {
            bind(v.name, t, subst, worklist)
        }
        (Type::Atom(UAtom::Var(v1)), Type::Atom(UAtom::Var(v2))) => {
            // Both remaining cases have skolem kind (unification vars were
            // handled above), so this succeeds only when they're the same
            // skolem.
            if v1.name == v2.name {
                Ok(())
            } else {
                Err(SolveError::NoUnify)
            }
        }
        (Type::Con(c1, ts), Type::Con(c2, us)) if c1 == c2 && ts.len() == us.len() => {
            for pair in ts.into_iter().zip(us) {
                worklist.push_back(pair);
            }
            Ok(())
        }
        _ => Err(SolveError::NoUnify),
    }
}

/// Bind unification variable `name` to `t`, after an occurs check, folding
/// the new binding into both the running substitution and the pending
/// worklist.
fn bind(
    name: VarName,
    t: Type,
    subst: &mut Substitution,
    worklist: &mut VecDeque<(Type, Type)>,
) -> Result<(), SolveError> {
    if let Type::Atom(UAtom::Var(v)) = &t {
        if v.name == name && matches!(v.kind, VarKind::Unif) {
            return Ok(());
        }
    }

    let mut occurs = Vec::new();
    t.free_unif_vars(&mut occurs);
    if occurs.contains(&name) {
        return Err(SolveError::NoUnify);
    }

    let binding = Substitution::singleton(name, t);
    for (a, b) in worklist.iter_mut() {
        *a = binding.apply(a);
        *b = binding.apply(b);
    }
    *subst = Substitution::compose(&binding, subst);
    Ok(())
}

/// The same algorithm as [unify], but every subtyping constraint is treated
/// as an equation, and skolems are treated as bindable placeholders rather
/// than rigid atoms. Its only purpose is to prove the subtyping problem's
/// structure is finite (no infinite type would be needed) before the
/// simplifier is allowed to run; the resulting substitution is discarded.
///
/// Skolems are deliberately loosened here: rigidity is a semantic property
/// enforced later by [crate::skolem::skolem_check], not a structural one.
/// Treating a skolem as rigid in this pass would make `All(a. a <: Int)`
/// fail with `NoWeakUnifier` before the skolem check ever runs, reporting
/// the wrong error kind for what is really a skolem-vs-base mismatch.
pub fn weak_unify(defs: &TypeSynonyms, constraints: &[SimpleConstraint]) -> Result<(), SolveError> {
    let eqs = constraints
        .iter()
        .map(|c| {
            let (l, r) = c.sides();
            (l.clone(), r.clone())
        })
        .collect();

    weak_unify_eqs(defs, eqs).map(|_| ()).map_err(|e| match e {
        // A reference to an undeclared type synonym is its own distinct
        // failure, not evidence of an infinite type; let it surface as-is
        // rather than masking it behind `NoWeakUnifier`.
        SolveError::Unknown(name) => SolveError::Unknown(name),
        _ => SolveError::NoWeakUnifier,
    })
}

fn weak_unify_eqs(defs: &TypeSynonyms, eqs: Vec<(Type, Type)>) -> Result<Substitution, SolveError> {
    let mut subst = Substitution::empty();
    let mut worklist: VecDeque<(Type, Type)> = eqs.into_iter().collect();

    while let Some((l, r)) = worklist.pop_front() {
        let l = subst.apply(&l);
        let r = subst.apply(&r);
        weak_unify_step(defs, l, r, &mut subst, &mut worklist)?;
    }

    Ok(subst)
}

fn weak_unify_step(
    defs: &TypeSynonyms,
    l: Type,
    r: Type,
    subst: &mut Substitution,
    worklist: &mut VecDeque<(Type, Type)>,
) -> Result<(), SolveError> {
    match (l, r) {
        (Type::Syn(name), other) => {
            let expanded = expand_synonym(defs, &name)?;
            worklist.push_back((expanded, other));
            Ok(())
        }
        (other, Type::Syn(name)) => {
            let expanded = expand_synonym(defs, &name)?;
            worklist.push_back((other, expanded));
            Ok(())
        }
        (Type::Atom(UAtom::Var(v)), t) => weak_bind(v.name, t, subst, worklist),
        (t, Type::Atom(UAtom::Var(v))) => weak_bind(v.name, t, subst, worklist),
        (Type::Atom(UAtom::Base(b1)), Type::Atom(UAtom::Base(b2))) => {
            if b1 == b2 {
                Ok(())
            } else {
                Err(SolveError::NoUnify)
            }
        }
        (Type::Con(c1, ts), Type::Con(c2, us)) if c1 == c2 && ts.len() == us.len() => {
            for pair in ts.into_iter().zip(us) {
                worklist.push_back(pair);
            }
            Ok(())
        }
        _ => Err(SolveError::NoUnify),
    }
}

/// Bind `name` (unification variable or skolem alike) to `t`, after an
/// occurs check against all variable atoms, not just unification ones.
fn weak_bind(name: VarName, t: Type, subst: &mut Substitution, worklist: &mut VecDeque<(Type, Type)>) -> Result<(), SolveError> {
    if let Type::Atom(UAtom::Var(v)) = &t {
        if v.name == name {
            return Ok(());
        }
    }

    let mut occurs = Vec::new();
    collect_var_names(&t, &mut occurs);
    if occurs.contains(&name) {
        return Err(SolveError::NoUnify);
    }

    let binding = Substitution::singleton(name, t);
    for (a, b) in worklist.iter_mut() {
        *a = binding.apply(a);
        *b = binding.apply(b);
    }
    *subst = Substitution::compose(&binding, subst);
    Ok(())
}

/// Every variable name occurring in `t`, unification or skolem alike (unlike
/// [Type::free_unif_vars], which only collects unification variables).
fn collect_var_names(t: &Type, out: &mut Vec<VarName>) {
    match t {
        Type::Atom(UAtom::Var(v)) => out.push(v.name),
        Type::Atom(UAtom::Base(_)) => {}
        Type::Con(_, args) => args.iter().for_each(|a| collect_var_names(a, out)),
        Type::Syn(_) => {}
    }
}

/// Unify a set of atoms (vertices of one weakly- or strongly-connected
/// component) to a single atom, producing the substitution that identifies
/// every unification variable among them with the chosen representative.
///
/// Fails on two distinct base atoms, a base atom together with a skolem, or
/// two distinct skolems — none of which can ever be made equal.
pub fn unify_atoms(atoms: &[UAtom]) -> Result<Substitution, SolveError> {
    let mut bases = Vec::new();
    let mut skolems = Vec::new();
    let mut unifs = Vec::new();

    for a in atoms {
        match a {
            UAtom::Base(b) => {
                if !bases.contains(b) {
                    bases.push(*b);
                }
            }
            UAtom::Var(v) if matches!(v.kind, VarKind::Skolem) => {
                if !skolems.contains(&v.name) {
                    skolems.push(v.name);
                }
            }
            UAtom::Var(v) => unifs.push(v.name),
        }
    }

    if bases.len() > 1 || skolems.len() > 1 {
        return Err(SolveError::NoUnify);
    }
    if !bases.is_empty() && !skolems.is_empty() {
        return Err(SolveError::NoUnify);
    }

    let target: Type = if let Some(b) = bases.first() {
        Type::base(*b)
    } else if let Some(s) = skolems.first() {
        Type::skolem(*s)
    } else if let Some(first) = unifs.iter().min().copied() {
        Type::unif(first)
    } else {
        // Nothing to unify (an empty or singleton component with no atoms
        // other than the one already chosen).
        return Ok(Substitution::empty());
    };

    let mut subst = Substitution::empty();
    for v in unifs {
        if Type::unif(v) != target {
            subst.insert(v, target.clone());
        }
    }
    Ok(subst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BaseType;

    #[test]
    fn unify_base_equal() {
        let defs = TypeSynonyms::new();
        let result = unify(&defs, vec![(Type::base(BaseType::Nat), Type::base(BaseType::Nat))]);
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn unify_base_mismatch() {
        let defs = TypeSynonyms::new();
        let result = unify(&defs, vec![(Type::base(BaseType::Nat), Type::base(BaseType::Bool))]);
        assert_eq!(result, Err(SolveError::NoUnify));
    }

    #[test]
    fn unify_occurs_check() {
        let defs = TypeSynonyms::new();
        let v = VarName(0);
        let self_referential = Type::arrow(Type::unif(v), Type::base(BaseType::Nat));
        let result = unify(&defs, vec![(Type::unif(v), self_referential)]);
        assert_eq!(result, Err(SolveError::NoUnify));
    }

    #[test]
    fn unify_atoms_base_and_vars() {
        let atoms = vec![
            UAtom::Base(BaseType::Nat),
            UAtom::Var(crate::types::VarAtom::unif(VarName(0))),
            UAtom::Var(crate::types::VarAtom::unif(VarName(1))),
        ];
        let subst = unify_atoms(&atoms).unwrap();
        assert_eq!(subst.get(VarName(0)), Some(&Type::base(BaseType::Nat)));
        assert_eq!(subst.get(VarName(1)), Some(&Type::base(BaseType::Nat)));
    }

    #[test]
    fn unify_atoms_distinct_bases_fail() {
        let atoms = vec![UAtom::Base(BaseType::Nat), UAtom::Base(BaseType::Bool)];
        assert_eq!(unify_atoms(&atoms), Err(SolveError::NoUnify));
    }
}
