use rand::Rng;
use tracing::{info, warn};

pub mod cmd;
pub mod error;
pub mod line_tracer;
pub mod map_file;
pub mod occupancy;
pub mod point;
pub mod render;
pub mod roadmap;
pub mod sampler;
pub mod search_iter;

pub use error::{PlanError, Result};
pub use occupancy::OccupancyField;
pub use point::FloatPoint;
pub use roadmap::Roadmap;
pub use search_iter::Path;

use occupancy::DEFAULT_THRESHOLD;
use roadmap::RoadmapBuilder;
use sampler::Sampler;

pub const DEFAULT_SAMPLES: usize = 100;
pub const DEFAULT_NEIGHBORS: usize = 5;

#[derive(Copy, Clone, Debug)]
pub struct PlannerBuilder {
    samples: usize,
    neighbors: usize,
    threshold: u8,
    max_attempts: Option<usize>,
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            neighbors: DEFAULT_NEIGHBORS,
            threshold: DEFAULT_THRESHOLD,
            max_attempts: None,
        }
    }
}

impl PlannerBuilder {
    pub fn samples(&mut self, samples: usize) -> &mut Self {
        self.samples = samples;
        self
    }

    pub fn neighbors(&mut self, neighbors: usize) -> &mut Self {
        self.neighbors = neighbors;
        self
    }

    pub fn threshold(&mut self, threshold: u8) -> &mut Self {
        self.threshold = threshold;
        self
    }

    pub fn max_attempts(&mut self, max_attempts: usize) -> &mut Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn build(&self) -> Result<Planner> {
        if self.samples == 0 {
            return Err(PlanError::InvalidInput("sample count must be positive".into()));
        }
        if self.neighbors == 0 {
            return Err(PlanError::InvalidInput(
                "neighbor count must be positive".into(),
            ));
        }
        Ok(Planner {
            samples: self.samples,
            threshold: self.threshold,
            sampler: Sampler::new(self.max_attempts),
            builder: RoadmapBuilder::new(self.neighbors),
        })
    }
}

/// Result of one query: the roadmap that was searched and the route, if any.
#[derive(Clone, Debug)]
pub struct Plan {
    pub roadmap: Roadmap,
    pub path: Option<Path>,
}

impl Plan {
    pub const START: usize = 0;

    pub fn goal(&self) -> usize {
        self.roadmap.len() - 1
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Planner {
    samples: usize,
    threshold: u8,
    sampler: Sampler,
    builder: RoadmapBuilder,
}

impl Planner {
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Builds a fresh roadmap holding `start`, the samples and `goal` (in
    /// that order), then searches it. The field is read with this planner's
    /// threshold.
    pub fn plan<R: Rng>(
        &self,
        field: &OccupancyField,
        start: FloatPoint,
        goal: FloatPoint,
        rng: &mut R,
    ) -> Result<Plan> {
        let field = field.with_threshold(self.threshold);
        for (name, p) in [("start", start), ("goal", goal)] {
            if !field.contains(p) {
                return Err(PlanError::InvalidInput(format!(
                    "{name} {p} is outside the {}x{} grid",
                    field.width(),
                    field.height()
                )));
            }
            if !field.is_free(p) {
                warn!(%p, "{name} lies inside an obstacle");
            }
        }

        let mut vertices = Vec::with_capacity(self.samples + 2);
        vertices.push(start);
        vertices.extend(self.sampler.sample(self.samples, &field, rng)?);
        vertices.push(goal);

        let roadmap = self.builder.build(vertices, &field);
        info!(
            vertices = roadmap.len(),
            edges = roadmap.edge_count(),
            "roadmap built"
        );

        let path = search_iter::search(&roadmap, Plan::START, roadmap.len() - 1);
        match &path {
            Some(path) => info!(
                vertices = path.len(),
                length = path.length(),
                "path found"
            ),
            None => info!("no path found"),
        }
        Ok(Plan { roadmap, path })
    }
}
