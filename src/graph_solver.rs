/*!
The graph solver: assigns base types to the unification variables left in a
cycle-free constraint graph, one variable per iteration, using sort-aware
greatest-lower-bound / least-upper-bound selection over each variable's
direct base and variable neighbors. Whatever remains once no variable has
base pressure or a nontrivial sort is a graph of variable-variable edges
only, quotiented by unification.
*/

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};

use crate::config::{Config, TieBreak};
use crate::generic::Substitution;
use crate::graph::ConstraintGraph;
use crate::misc::log::targets;
use crate::structures::sort::{base_leq, dir_types, has_sort, pick_sort_base, sort_of, Dir, Sort, SortMap};
use crate::types::err::SolveError;
use crate::types::{BaseType, Type, UAtom, VarKind, VarName};

/// The direct base and variable neighbors of one unification variable, in
/// one direction (predecessors or successors).
#[derive(Clone, Debug, Default)]
pub struct DirRels {
    pub base: BTreeSet<BaseType>,
    pub var: BTreeSet<VarName>,
}

#[derive(Clone, Debug, Default)]
pub struct VarRels {
    pub pred: DirRels,
    pub succ: DirRels,
}

impl VarRels {
    fn dir(&self, dir: Dir) -> &DirRels {
        match dir {
            Dir::Sub => &self.pred,
            Dir::Super => &self.succ,
        }
    }
}

/// Per-variable base/variable predecessor and successor sets, kept current
/// as variables are solved.
#[derive(Clone, Debug, Default)]
pub struct RelMap(BTreeMap<VarName, VarRels>);

impl RelMap {
    /// Build the initial relation map from a cycle-free constraint graph:
    /// every unification-variable vertex gets its direct predecessor and
    /// successor neighbors, split into base atoms and variable names.
    pub fn from_graph(graph: &ConstraintGraph) -> Self {
        let mut map = BTreeMap::new();
        for node in graph.nodes() {
            let Some(v) = node.as_var() else { continue };
            if !matches!(v.kind, VarKind::Unif) {
                continue;
            }
            let mut rels = VarRels::default();
            for p in graph.pred(node) {
                match p {
                    UAtom::Base(b) => {
                        rels.pred.base.insert(b);
                    }
                    UAtom::Var(pv) => {
                        rels.pred.var.insert(pv.name);
                    }
                }
            }
            for s in graph.succ(node) {
                match s {
                    UAtom::Base(b) => {
                        rels.succ.base.insert(b);
                    }
                    UAtom::Var(sv) => {
                        rels.succ.var.insert(sv.name);
                    }
                }
            }
            map.insert(v.name, rels);
        }
        RelMap(map)
    }

    /// Apply `v ↦ b`: drop `v` as a key, and in every remaining variable's
    /// relations, replace `v` (wherever it appears as a variable neighbor)
    /// with the base atom `b`.
    fn bind(&mut self, v: VarName, b: BaseType) {
        self.0.remove(&v);
        for rels in self.0.values_mut() {
            if rels.pred.var.remove(&v) {
                rels.pred.base.insert(b);
            }
            if rels.succ.var.remove(&v) {
                rels.succ.base.insert(b);
            }
        }
    }
}

/// `lim_by_sort(dir, ts, s, X)`: the direction-limit of `ts` within sort `s`,
/// constrained to types that admit a consistent choice for every variable
/// neighbor in `X`.
fn lim_by_sort(dir: Dir, ts: &BTreeSet<BaseType>, s: &Sort, xs: &BTreeSet<VarName>, rel_map: &RelMap, sort_map: &SortMap) -> Option<BaseType> {
    let mut sets = ts.iter().map(|&t| {
        dir_types(dir, t)
            .into_iter()
            .filter(|&t_prime| has_sort(t_prime, s))
            .filter(|&t_prime| {
                xs.iter().all(|beta| {
                    let beta_sort = sort_of(sort_map, *beta);
                    let other_rels = rel_map.0.get(beta).map(|r| r.dir(dir.flip()).base.clone()).unwrap_or_default();
                    dir_types(dir.flip(), t_prime).into_iter().any(|t_double_prime| {
                        has_sort(t_double_prime, &beta_sort) && other_rels.iter().all(|&u| dir_types(dir, u).contains(&t_double_prime))
                    })
                })
            })
            .collect::<BTreeSet<_>>()
    });

    let mut intersection = sets.next()?;
    for set in sets {
        intersection = intersection.intersection(&set).copied().collect();
    }

    // The dir-extreme member: the one closest to `ts` in direction `dir`,
    // i.e. whose own `dir_types` set already covers every other candidate
    // (for `dir = Super` this is the least upper bound; for `dir = Sub` the
    // greatest lower bound).
    intersection
        .iter()
        .copied()
        .find(|&cand| intersection.iter().all(|&other| dir_types(dir, cand).contains(&other)))
}

fn glb_by_sort(s: &Sort, xs: &BTreeSet<VarName>, ts: &BTreeSet<BaseType>, rel_map: &RelMap, sort_map: &SortMap) -> Option<BaseType> {
    lim_by_sort(Dir::Sub, ts, s, xs, rel_map, sort_map)
}

fn lub_by_sort(s: &Sort, xs: &BTreeSet<VarName>, ts: &BTreeSet<BaseType>, rel_map: &RelMap, sort_map: &SortMap) -> Option<BaseType> {
    lim_by_sort(Dir::Super, ts, s, xs, rel_map, sort_map)
}

/// Solve the (cycle-free, skolem-free) constraint graph: assign base types
/// to every pressured or sorted variable, then quotient whatever
/// variable-only graph remains by unification.
pub fn solve_graph(graph: &ConstraintGraph, mut sort_map: SortMap, config: &Config) -> Result<Substitution, SolveError> {
    let mut rel_map = RelMap::from_graph(graph);
    let mut subst = Substitution::empty();

    loop {
        let pressured = rel_map
            .0
            .iter()
            .find(|(_, rels)| !rels.pred.base.is_empty() || !rels.succ.base.is_empty())
            .map(|(v, _)| *v);
        let candidate = pressured.or_else(|| {
            rel_map
                .0
                .iter()
                .find(|(v, _)| !sort_of(&sort_map, **v).is_empty())
                .map(|(v, _)| *v)
        });

        let Some(v) = candidate else { break };
        let rels = rel_map.0.get(&v).expect("candidate drawn from rel_map's own keys").clone();
        let s = sort_of(&sort_map, v);

        let chosen = match (rels.pred.base.is_empty(), rels.succ.base.is_empty()) {
            (true, true) => pick_sort_base(&s).ok_or(SolveError::NoUnify)?,
            (true, false) => glb_by_sort(&s, &rels.succ.var, &rels.succ.base, &rel_map, &sort_map).ok_or(SolveError::NoUnify)?,
            (false, true) => lub_by_sort(&s, &rels.pred.var, &rels.pred.base, &rel_map, &sort_map).ok_or(SolveError::NoUnify)?,
            (false, false) => {
                let lb = lub_by_sort(&s, &rels.pred.var, &rels.pred.base, &rel_map, &sort_map).ok_or(SolveError::NoUnify)?;
                let ub = glb_by_sort(&s, &rels.succ.var, &rels.succ.base, &rel_map, &sort_map).ok_or(SolveError::NoUnify)?;
                if !base_leq(lb, ub) {
                    return Err(SolveError::NoUnify);
                }
                match config.subtype_tiebreak {
                    TieBreak::Lower => lb,
                    TieBreak::Upper => ub,
                }
            }
        };

        trace!(target: targets::GRAPH_SOLVE, "solved {v} = {chosen}");
        subst.insert(v, Type::base(chosen));
        rel_map.bind(v, chosen);
        sort_map.remove(&v);
    }

    let quotient = quotient_remaining(&rel_map);
    debug!(target: targets::GRAPH_SOLVE, "graph solve produced {subst}, quotient {quotient}");
    Ok(Substitution::compose(&quotient, &subst))
}

/// Final WCC unification: what remains in `rel_map` once no variable has
/// base pressure or a nontrivial sort has only variable-variable edges.
/// Quotient every such WCC by picking its smallest-named member canonical.
fn quotient_remaining(rel_map: &RelMap) -> Substitution {
    let mut parent: BTreeMap<VarName, VarName> = rel_map.0.keys().map(|&v| (v, v)).collect();

    fn find(parent: &mut BTreeMap<VarName, VarName>, v: VarName) -> VarName {
        let p = parent[&v];
        if p == v {
            v
        } else {
            let root = find(parent, p);
            parent.insert(v, root);
            root
        }
    }

    for (&v, rels) in rel_map.0.iter() {
        for &n in rels.pred.var.iter().chain(rels.succ.var.iter()) {
            if !rel_map.0.contains_key(&n) {
                continue;
            }
            let rv = find(&mut parent, v);
            let rn = find(&mut parent, n);
            if rv != rn {
                let (lo, hi) = if rv < rn { (rv, rn) } else { (rn, rv) };
                parent.insert(hi, lo);
            }
        }
    }

    let mut subst = Substitution::empty();
    for &v in rel_map.0.keys() {
        let root = find(&mut parent, v);
        if root != v {
            subst.insert(v, Type::unif(root));
        }
    }
    subst
}
