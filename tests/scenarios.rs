//! End-to-end solve scenarios and a few headline correctness properties,
//! mixed with a few corollary edge cases, satisfiable and unsatisfiable
//! cases side by side in one module.

use disco_infer::config::{Config, TieBreak};
use disco_infer::driver::solve;
use disco_infer::structures::Constraint;
use disco_infer::types::err::SolveError;
use disco_infer::types::{BaseType, Type, TypeSynonyms, VarName};

fn defs() -> TypeSynonyms {
    TypeSynonyms::new()
}

#[test]
fn scenario_1_variable_below_int() {
    let v = VarName(0);
    let c = Constraint::Sub(Type::unif(v), Type::base(BaseType::Int));

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    assert_eq!(result.get(v), Some(&Type::base(BaseType::Int)));
}

#[test]
fn scenario_2_qualified_variable_above_nat() {
    let v = VarName(0);
    let c = Constraint::And(vec![
        Constraint::Qual(disco_infer::structures::sort::Qualifier::Num, Type::unif(v)),
        Constraint::Sub(Type::base(BaseType::Nat), Type::unif(v)),
    ]);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    assert_eq!(result.get(v), Some(&Type::base(BaseType::Nat)));
}

#[test]
fn scenario_3_mutual_subtyping_collapses_to_one_variable() {
    let v1 = VarName(0);
    let v2 = VarName(1);
    let c = Constraint::And(vec![
        Constraint::Sub(Type::unif(v1), Type::unif(v2)),
        Constraint::Sub(Type::unif(v2), Type::unif(v1)),
    ]);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    let collapsed = match (result.get(v1), result.get(v2)) {
        (Some(Type::Atom(a)), None) => *a == disco_infer::types::UAtom::Var(disco_infer::types::VarAtom::unif(v2)),
        (None, Some(Type::Atom(a))) => *a == disco_infer::types::UAtom::Var(disco_infer::types::VarAtom::unif(v1)),
        _ => false,
    };
    assert!(collapsed, "expected exactly one of v1/v2 mapped onto the other, got {result}");
}

#[test]
fn scenario_3_extended_three_cycle_collapses_to_one_representative() {
    let v1 = VarName(0);
    let v2 = VarName(1);
    let v3 = VarName(2);
    let c = Constraint::And(vec![
        Constraint::Sub(Type::unif(v1), Type::unif(v2)),
        Constraint::Sub(Type::unif(v2), Type::unif(v3)),
        Constraint::Sub(Type::unif(v3), Type::unif(v1)),
    ]);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    let bound: Vec<VarName> = [v1, v2, v3].into_iter().filter(|v| result.contains_key(*v)).collect();
    assert_eq!(bound.len(), 2, "a 3-cycle should collapse onto a single surviving representative, got {result}");
}

#[test]
fn scenario_4_skolem_cannot_unify_with_base() {
    let a = VarName(0);
    let c = Constraint::All(vec![a], Box::new(Constraint::Sub(Type::unif(a), Type::base(BaseType::Int))));

    let result = solve(&defs(), &c, &Config::default());
    assert_eq!(result, Err(SolveError::NoUnify));
}

#[test]
fn scenario_5_arrow_is_contravariant_in_its_domain() {
    let v1 = VarName(0);
    let v2 = VarName(1);
    let lhs = Type::arrow(Type::unif(v1), Type::unif(v2));
    let rhs = Type::arrow(Type::base(BaseType::Int), Type::base(BaseType::Nat));
    let c = Constraint::Sub(lhs, rhs);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    assert_eq!(result.get(v1), Some(&Type::base(BaseType::Int)));
    assert_eq!(result.get(v2), Some(&Type::base(BaseType::Nat)));
}

#[test]
fn scenario_6_bool_does_not_satisfy_num() {
    let c = Constraint::Qual(disco_infer::structures::sort::Qualifier::Num, Type::base(BaseType::Bool));

    let result = solve(&defs(), &c, &Config::default());
    assert_eq!(result, Err(SolveError::UnqualBase(disco_infer::structures::sort::Qualifier::Num, BaseType::Bool)));
}

#[test]
fn scenario_7_or_picks_the_first_satisfiable_alternative() {
    let v = VarName(0);
    let c = Constraint::Or(vec![
        Constraint::Eq(Type::unif(v), Type::base(BaseType::Int)),
        Constraint::Eq(Type::unif(v), Type::base(BaseType::Nat)),
    ]);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    assert_eq!(result.get(v), Some(&Type::base(BaseType::Int)));
}

/// Property P3: a weak-unify failure (an occurs-check cycle through a
/// constructor) is reported as `NoWeakUnifier`, never reaching simplification.
#[test]
fn weak_unify_rejects_infinite_types_before_simplifying() {
    let v = VarName(0);
    let infinite = Type::arrow(Type::unif(v), Type::base(BaseType::Int));
    let c = Constraint::Sub(Type::unif(v), infinite);

    let result = solve(&defs(), &c, &Config::default());
    assert_eq!(result, Err(SolveError::NoWeakUnifier));
}

/// Property P6 (idempotence) on a realistic multi-variable system: applying
/// the result substitution to itself is a no-op.
#[test]
fn successful_solves_are_idempotent() {
    let v1 = VarName(0);
    let v2 = VarName(1);
    let c = Constraint::And(vec![
        Constraint::Sub(Type::unif(v1), Type::unif(v2)),
        Constraint::Sub(Type::base(BaseType::Nat), Type::unif(v1)),
    ]);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    for (_, t) in result.iter() {
        assert_eq!(result.apply(t), t.clone());
    }
}

/// An edge case beyond the scenario table: a constructed type with no
/// qualifier rule for the qualifier requested fails `Unqual`, not `NoUnify`.
#[test]
fn unqualifiable_constructor_fails_unqual() {
    let c = Constraint::Qual(
        disco_infer::structures::sort::Qualifier::Bool,
        Type::arrow(Type::base(BaseType::Int), Type::base(BaseType::Int)),
    );

    let result = solve(&defs(), &c, &Config::default());
    assert!(matches!(result, Err(SolveError::Unqual(_, _))));
}

/// An edge case beyond the scenario table: referencing an undeclared type
/// synonym fails `Unknown`.
#[test]
fn unknown_type_synonym_fails() {
    let c = Constraint::Sub(Type::Syn("Matrix".to_string()), Type::base(BaseType::Int));

    let result = solve(&defs(), &c, &Config::default());
    assert_eq!(result, Err(SolveError::Unknown("Matrix".to_string())));
}

/// A variable with both a base predecessor and a base successor: the graph
/// solver must compute both `lb` and `ub`, check `lb <=b ub`, and apply the
/// tie-break policy. Default is `TieBreak::Lower`, so `v` lands on the lower
/// bound, `Int`.
#[test]
fn graph_solve_both_bounds_present_defaults_to_lower() {
    let v = VarName(0);
    let c = Constraint::And(vec![
        Constraint::Sub(Type::base(BaseType::Int), Type::unif(v)),
        Constraint::Sub(Type::unif(v), Type::base(BaseType::Real)),
    ]);

    let result = solve(&defs(), &c, &Config::default()).unwrap();
    assert_eq!(result.get(v), Some(&Type::base(BaseType::Int)));
}

/// The same constraint as above, but with `TieBreak::Upper`: `v` lands on
/// the upper bound, `Real`, instead.
#[test]
fn graph_solve_both_bounds_present_upper_tiebreak() {
    let v = VarName(0);
    let c = Constraint::And(vec![
        Constraint::Sub(Type::base(BaseType::Int), Type::unif(v)),
        Constraint::Sub(Type::unif(v), Type::base(BaseType::Real)),
    ]);

    let config = Config::with_tiebreak(TieBreak::Upper);
    let result = solve(&defs(), &c, &config).unwrap();
    assert_eq!(result.get(v), Some(&Type::base(BaseType::Real)));
}

/// A variable with a base predecessor and a base successor that disagree
/// (`lb` not `<=b` `ub`): the consistency check must fail with `NoUnify`
/// regardless of tie-break policy.
#[test]
fn graph_solve_both_bounds_present_inconsistent_fails() {
    let v = VarName(0);
    let c = Constraint::And(vec![
        Constraint::Sub(Type::base(BaseType::Real), Type::unif(v)),
        Constraint::Sub(Type::unif(v), Type::base(BaseType::Int)),
    ]);

    let result = solve(&defs(), &c, &Config::default());
    assert_eq!(result, Err(SolveError::NoUnify));
}
