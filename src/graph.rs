/*!
The constraint graph: vertices are atoms, edges are `a <: b` relations that
survived simplification.

Built on `petgraph`. Atoms are `Copy + Ord + Hash`, so
[petgraph::graphmap::DiGraphMap] is the natural backing structure: no
separate node-index table is needed, and edges are addressed by the atoms
themselves.
*/

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graphmap::DiGraphMap;
use petgraph::unionfind::UnionFind;
use petgraph::visit::{EdgeRef, IntoNodeReferences};

use crate::types::UAtom;

/// A directed graph over atoms, edges meaning `a <: b`.
#[derive(Clone, Debug, Default)]
pub struct ConstraintGraph {
    inner: DiGraphMap<UAtom, ()>,
}

impl ConstraintGraph {
    /// Build a graph from an explicit vertex set and edge list. Vertices
    /// mentioned only by an edge are added implicitly.
    pub fn mk_graph(nodes: impl IntoIterator<Item = UAtom>, edges: impl IntoIterator<Item = (UAtom, UAtom)>) -> Self {
        let mut inner = DiGraphMap::new();
        for n in nodes {
            inner.add_node(n);
        }
        for (a, b) in edges {
            inner.add_edge(a, b, ());
        }
        ConstraintGraph { inner }
    }

    pub fn nodes(&self) -> BTreeSet<UAtom> {
        self.inner.nodes().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Direct predecessors of `v`: atoms `a` with an edge `a <: v`.
    pub fn pred(&self, v: UAtom) -> BTreeSet<UAtom> {
        self.inner.neighbors_directed(v, petgraph::Direction::Incoming).collect()
    }

    /// Direct successors of `v`: atoms `b` with an edge `v <: b`.
    pub fn succ(&self, v: UAtom) -> BTreeSet<UAtom> {
        self.inner.neighbors_directed(v, petgraph::Direction::Outgoing).collect()
    }

    pub fn delete(&mut self, v: UAtom) {
        self.inner.remove_node(v);
    }

    /// Weakly-connected components: maximal sets of vertices connected when
    /// edge direction is ignored. Computed with `petgraph`'s union-find over
    /// a dense index assigned to each node, then read back into atom sets.
    pub fn wcc(&self) -> Vec<BTreeSet<UAtom>> {
        let index_of: BTreeMap<UAtom, usize> = self.inner.nodes().enumerate().map(|(i, n)| (n, i)).collect();
        let mut uf = UnionFind::new(index_of.len().max(1));
        for (a, b, ()) in self.inner.all_edges() {
            uf.union(index_of[&a], index_of[&b]);
        }
        let mut groups: BTreeMap<usize, BTreeSet<UAtom>> = BTreeMap::new();
        for (&atom, &idx) in index_of.iter() {
            groups.entry(uf.find(idx)).or_default().insert(atom);
        }
        groups.into_values().collect()
    }

    /// Strongly-connected components, in a deterministic order (by their
    /// smallest member atom), each component's members sorted.
    pub fn scc(&self) -> Vec<Vec<UAtom>> {
        let mut components: Vec<Vec<UAtom>> = petgraph::algo::tarjan_scc(&self.inner);
        for c in components.iter_mut() {
            c.sort();
        }
        components.sort_by(|a, b| a.first().cmp(&b.first()));
        components
    }

    /// The condensation: one vertex per SCC, with an edge between two SCCs
    /// iff some member of the first has an edge to some member of the
    /// second. Self-loops (an edge internal to one SCC) are dropped.
    ///
    /// The representative picked per SCC here is its `Ord`-smallest member,
    /// a general-purpose choice for callers that just want a quotient graph
    /// to query. [crate::cycle::eliminate_cycles] does not use this: it
    /// quotients by the atom [crate::unify::unify_atoms] actually unifies
    /// each SCC to, so the graph stays consistent with the substitution it
    /// returns.
    pub fn condensation(&self) -> (ConstraintGraph, BTreeMap<UAtom, UAtom>) {
        let sccs = self.scc();
        // Canonical representative per SCC: its smallest member.
        let mut rep_of: BTreeMap<UAtom, UAtom> = BTreeMap::new();
        for comp in &sccs {
            let rep = *comp.first().expect("tarjan_scc never yields an empty component");
            for &member in comp {
                rep_of.insert(member, rep);
            }
        }
        let nodes = sccs.iter().map(|c| *c.first().unwrap());
        let edges = self
            .inner
            .all_edges()
            .map(|(a, b, ())| (rep_of[&a], rep_of[&b]))
            .filter(|(a, b)| a != b);
        (ConstraintGraph::mk_graph(nodes, edges), rep_of)
    }

    /// Rebuild the graph with every node rewritten by `f`, merging any nodes
    /// that collapse onto the same image and dropping self-loops introduced
    /// by the merge. Used to quotient the graph by a unifying substitution.
    pub fn map(&self, f: impl Fn(UAtom) -> UAtom) -> ConstraintGraph {
        let nodes = self.inner.node_references().map(|(n, ())| f(n));
        let edges = self.inner.all_edges().map(|(a, b, ())| (f(a), f(b))).filter(|(a, b)| a != b);
        ConstraintGraph::mk_graph(nodes, edges)
    }
}
