/*!
Cycle elimination: collapses every strongly-connected component of the
(skolem-checked) constraint graph to a single atom, leaving a DAG.
*/

use log::{debug, trace};

use crate::generic::Substitution;
use crate::graph::ConstraintGraph;
use crate::misc::log::targets;
use crate::structures::sort::{has_sort, SortMap};
use crate::types::err::SolveError;
use crate::types::{Type, UAtom};
use crate::unify::unify_atoms;

/// Condense the graph's SCCs, unifying the atoms within each, and verify the
/// resulting bindings against the sort map (I5, and the second half of I1).
///
/// Returns the unifying substitution; the graph is quotiented in place to
/// its condensation, every vertex of an SCC replaced by the representative
/// atom `unify_atoms` chose for it.
pub fn eliminate_cycles(graph: &mut ConstraintGraph, sort_map: &SortMap) -> Result<Substitution, SolveError> {
    let sccs = graph.scc();
    let mut subst = Substitution::empty();

    for members in &sccs {
        if members.len() < 2 {
            continue;
        }
        trace!(target: targets::CYCLE_ELIM, "collapsing SCC {members:?}");
        let scc_subst = unify_atoms(members)?;
        subst = Substitution::compose(&scc_subst, &subst);
    }

    for (v, t) in subst.iter() {
        if let Type::Atom(UAtom::Base(b)) = t {
            if let Some(s) = sort_map.get(&v) {
                if !has_sort(*b, s) {
                    return Err(SolveError::UnqualBase(*s.iter().next().expect("non-top sort has a qualifier"), *b));
                }
            }
        }
    }

    debug!(target: targets::CYCLE_ELIM, "cycle elimination produced {subst}");
    // Quotient the graph by the very substitution just computed, so the
    // representative atom the graph now carries for each collapsed SCC is
    // exactly the one `subst` maps its members to (I5).
    *graph = graph.map(|a| subst.apply(&Type::Atom(a)).as_atom().unwrap_or(a));

    Ok(subst)
}
