/*!
The skolem check: walks each weakly-connected component of the atom graph
and either rejects it outright or collapses it by unification.
*/

use log::{debug, trace};

use crate::generic::Substitution;
use crate::graph::ConstraintGraph;
use crate::misc::log::targets;
use crate::structures::sort::SortMap;
use crate::types::err::SolveError;
use crate::types::{Type, UAtom, VarKind};
use crate::unify::unify_atoms;

/// Check and collapse skolem-containing weakly-connected components.
///
/// A WCC is rejected (`NoUnify`) if it contains more than one skolem, or a
/// skolem alongside a base atom, or a skolem alongside a unification
/// variable that carries a non-top sort. A WCC with exactly one skolem and
/// otherwise top-sorted unification variables is collapsed: every member is
/// unified to the skolem, the graph is quotiented by the result, and the
/// unifying substitution is composed into the one returned.
///
/// WCCs with no skolem at all are left untouched; they are handled later by
/// [crate::cycle] and [crate::graph_solver].
pub fn skolem_check(graph: &mut ConstraintGraph, sort_map: &mut SortMap) -> Result<Substitution, SolveError> {
    let mut subst = Substitution::empty();

    for wcc in graph.wcc() {
        let skolems: Vec<UAtom> = wcc.iter().copied().filter(|a| a.is_skolem()).collect();
        if skolems.is_empty() {
            continue;
        }

        let bases: Vec<UAtom> = wcc.iter().copied().filter(|a| a.as_base().is_some()).collect();
        if skolems.len() > 1 {
            trace!(target: targets::SKOLEM_CHECK, "WCC {wcc:?} has {} skolems", skolems.len());
            return Err(SolveError::NoUnify);
        }
        if !bases.is_empty() {
            trace!(target: targets::SKOLEM_CHECK, "WCC {wcc:?} mixes a skolem with a base atom");
            return Err(SolveError::NoUnify);
        }

        let all_top_sorted = wcc.iter().filter_map(|a| a.as_var()).filter(|v| matches!(v.kind, VarKind::Unif)).all(|v| {
            sort_map.get(&v.name).map_or(true, |s| s.is_empty())
        });
        if !all_top_sorted {
            trace!(target: targets::SKOLEM_CHECK, "WCC {wcc:?} has a sorted unification variable alongside a skolem");
            return Err(SolveError::NoUnify);
        }

        let members: Vec<UAtom> = wcc.into_iter().collect();
        let wcc_subst = unify_atoms(&members)?;
        debug!(target: targets::SKOLEM_CHECK, "collapsing skolem WCC via {wcc_subst}");

        *graph = graph.map(|a| wcc_subst.apply(&Type::Atom(a)).as_atom().unwrap_or(a));
        for v in wcc_subst.keys() {
            sort_map.remove(&v);
        }
        subst = Substitution::compose(&wcc_subst, &subst);
    }

    Ok(subst)
}
