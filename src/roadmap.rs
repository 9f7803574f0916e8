use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::{line_tracer::LineTracer, occupancy::OccupancyField, point::FloatPoint};

/// Undirected roadmap graph: a vertex arena with index-keyed adjacency.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roadmap {
    vertices: Vec<FloatPoint>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl Roadmap {
    pub fn new(vertices: Vec<FloatPoint>) -> Self {
        let adjacency = vec![BTreeSet::new(); vertices.len()];
        Self {
            vertices,
            adjacency,
        }
    }

    /// Returns `false` for self loops, unknown vertices and existing edges.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.len() || b >= self.len() {
            return false;
        }
        let added = self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        added
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, v: usize) -> Option<FloatPoint> {
        self.vertices.get(v).copied()
    }

    pub fn vertices(&self) -> &[FloatPoint] {
        &self.vertices
    }

    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(v).into_iter().flatten().copied()
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency.get(v).map_or(0, BTreeSet::len)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|adj| adj.contains(&b))
    }

    /// Each undirected edge once, as `(lo, hi)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, adj)| adj.range(a + 1..).map(move |b| (a, *b)))
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn edge_length(&self, a: usize, b: usize) -> f64 {
        self.vertices[a].euclidean_distance(self.vertices[b])
    }
}

/// Connects each vertex to its `k` nearest neighbors in line of sight.
#[derive(Copy, Clone, Debug)]
pub struct RoadmapBuilder {
    k: usize,
}

impl RoadmapBuilder {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn build(&self, vertices: Vec<FloatPoint>, field: &OccupancyField) -> Roadmap {
        let tracer = LineTracer::new(field);
        let mut roadmap = Roadmap::new(vertices);
        let mut sight = HashMap::new();
        for v in 0..roadmap.len() {
            for u in self.ranked_candidates(&roadmap, v, &tracer, &mut sight) {
                roadmap.add_edge(v, u);
            }
        }
        debug!(
            vertices = roadmap.len(),
            edges = roadmap.edge_count(),
            traced = sight.len(),
            "roadmap connected"
        );
        roadmap
    }

    /// The first `k` visible vertices by ascending distance from `v`.
    /// Equal distances keep enumeration order.
    fn ranked_candidates(
        &self,
        roadmap: &Roadmap,
        v: usize,
        tracer: &LineTracer,
        sight: &mut HashMap<(usize, usize), bool>,
    ) -> Vec<usize> {
        let here = roadmap.vertices[v];
        let mut candidates = (0..roadmap.len())
            .filter(|u| *u != v)
            .filter(|u| {
                let key = (v.min(*u), v.max(*u));
                !*sight
                    .entry(key)
                    .or_insert_with(|| tracer.is_blocked(here, roadmap.vertices[*u]))
            })
            .map(|u| (here.euclidean_distance(roadmap.vertices[u]), u))
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.into_iter().take(self.k).map(|(_, u)| u).collect()
    }
}
