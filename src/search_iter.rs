use common_macros::hash_map;
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use trait_set::trait_set;

use crate::{point::FloatPoint, roadmap::Roadmap};

trait_set! {
    pub trait SearchNode = Clone + Hash + Eq + Debug;
}

fn path_back_from<T: SearchNode>(node: &T, parents: &HashMap<T, Option<T>>) -> VecDeque<T> {
    let mut result = VecDeque::new();
    let mut current = node;
    result.push_back(current.clone());
    while let Some(Some(parent)) = parents.get(current) {
        result.push_back(parent.clone());
        current = parent;
    }
    result
}

/// Queue priority. Lower `f` wins, then lower `g`, then the earlier insertion,
/// so equal estimates never fall back to comparing nodes.
#[derive(Copy, Clone, Debug, Default)]
struct TotalEstimate {
    from_start: f64,
    estimate_to_goal: f64,
    sequence: u64,
}

impl TotalEstimate {
    fn total(&self) -> f64 {
        self.from_start + self.estimate_to_goal
    }
}

// PriorityQueue pops the maximum, so every comparison is reversed.
impl Ord for TotalEstimate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total()
            .total_cmp(&self.total())
            .then_with(|| other.from_start.total_cmp(&self.from_start))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for TotalEstimate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TotalEstimate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TotalEstimate {}

/// A* as an iterator over nodes in the order they are finalized.
///
/// The frontier supports decrease-key, and a finalized node is never queued
/// or expanded again.
pub struct PrioritySearchIter<T: SearchNode, S: FnMut(&T) -> Vec<(T, f64)>, H: Fn(&T) -> f64> {
    queue: PriorityQueue<T, TotalEstimate>,
    costs: HashMap<T, f64>,
    parents: HashMap<T, Option<T>>,
    successor: S,
    heuristic: H,
    pushes: u64,
}

impl<T: SearchNode, S: FnMut(&T) -> Vec<(T, f64)>, H: Fn(&T) -> f64> PrioritySearchIter<T, S, H> {
    pub fn a_star(start: T, successor: S, heuristic: H) -> Self {
        let mut queue = PriorityQueue::new();
        queue.push(
            start.clone(),
            TotalEstimate {
                estimate_to_goal: heuristic(&start),
                ..TotalEstimate::default()
            },
        );
        Self {
            queue,
            costs: HashMap::new(),
            successor,
            parents: hash_map!(start => None),
            heuristic,
            pushes: 1,
        }
    }

    pub fn path_back_from(&self, node: &T) -> VecDeque<T> {
        path_back_from(node, &self.parents)
    }

    /// Cost from the start, once `node` has been finalized.
    pub fn cost_for(&self, node: &T) -> Option<f64> {
        self.costs.get(node).copied()
    }

    fn estimate(&mut self, from_start: f64, node: &T) -> TotalEstimate {
        self.pushes += 1;
        TotalEstimate {
            from_start,
            estimate_to_goal: (self.heuristic)(node),
            sequence: self.pushes,
        }
    }
}

impl<T: SearchNode, S: FnMut(&T) -> Vec<(T, f64)>, H: Fn(&T) -> f64> Iterator
    for PrioritySearchIter<T, S, H>
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, cost) = self.queue.pop()?;
        self.costs.insert(parent.clone(), cost.from_start);
        for (child, step_cost) in (self.successor)(&parent) {
            if self.costs.contains_key(&child) {
                continue;
            }
            let from_start = cost.from_start + step_cost;
            let improves = self
                .queue
                .get_priority(&child)
                .is_none_or(|known| from_start < known.from_start);
            if improves {
                let priority = self.estimate(from_start, &child);
                self.parents.insert(child.clone(), Some(parent.clone()));
                self.queue.push(child, priority);
            }
        }
        Some(parent)
    }
}

/// Start-to-goal route through the roadmap.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    vertices: Vec<usize>,
    points: Vec<FloatPoint>,
    length: f64,
}

impl Path {
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn points(&self) -> &[FloatPoint] {
        &self.points
    }

    /// Cost of the goal as computed by the search.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Shortest roadmap path from `start` to `goal` with a Euclidean heuristic.
/// `None` when the goal is unreachable or either index is unknown.
pub fn search(roadmap: &Roadmap, start: usize, goal: usize) -> Option<Path> {
    roadmap.vertex(start)?;
    let goal_point = roadmap.vertex(goal)?;
    let mut searcher = PrioritySearchIter::a_star(
        start,
        |v: &usize| {
            roadmap
                .neighbors(*v)
                .map(|u| (u, roadmap.edge_length(*v, u)))
                .collect()
        },
        |v: &usize| roadmap.vertices()[*v].euclidean_distance(goal_point),
    );
    let found = searcher.by_ref().find(|v| *v == goal)?;
    let length = searcher.cost_for(&found)?;
    let vertices = searcher
        .path_back_from(&found)
        .into_iter()
        .rev()
        .collect::<Vec<_>>();
    let points = vertices.iter().map(|v| roadmap.vertices()[*v]).collect();
    Some(Path {
        vertices,
        points,
        length,
    })
}
