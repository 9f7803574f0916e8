use rand::{Rng, distr::Uniform};
use tracing::debug;

use crate::{
    error::{PlanError, Result},
    occupancy::OccupancyField,
    point::FloatPoint,
};

pub const DEFAULT_ATTEMPTS_PER_SAMPLE: usize = 10_000;

/// Uniform rejection sampler over the free cells of a field.
///
/// The number of draws is capped; on a nearly full map an uncapped sampler
/// would never return.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sampler {
    max_attempts: Option<usize>,
}

impl Sampler {
    /// Caps the total number of draws. `None` uses
    /// [`DEFAULT_ATTEMPTS_PER_SAMPLE`] per requested sample.
    pub fn new(max_attempts: Option<usize>) -> Self {
        Self { max_attempts }
    }

    pub fn budget_for(&self, n: usize) -> usize {
        self.max_attempts
            .unwrap_or_else(|| n.saturating_mul(DEFAULT_ATTEMPTS_PER_SAMPLE))
    }

    pub fn sample<R: Rng>(
        &self,
        n: usize,
        field: &OccupancyField,
        rng: &mut R,
    ) -> Result<Vec<FloatPoint>> {
        let budget = self.budget_for(n);
        let exhausted = |accepted: usize, attempts: usize| PlanError::SamplingExhausted {
            requested: n,
            accepted,
            attempts,
        };
        if n > 0 && field.free_cell_count() == 0 {
            return Err(exhausted(0, 0));
        }

        let xs = Uniform::new(0.0, field.width() as f64)
            .map_err(|e| PlanError::InvalidInput(format!("sampling width: {e}")))?;
        let ys = Uniform::new(0.0, field.height() as f64)
            .map_err(|e| PlanError::InvalidInput(format!("sampling height: {e}")))?;

        let mut samples = Vec::with_capacity(n);
        let mut attempts = 0;
        while samples.len() < n {
            if attempts >= budget {
                return Err(exhausted(samples.len(), attempts));
            }
            attempts += 1;
            let p = FloatPoint::new([rng.sample(&xs), rng.sample(&ys)]);
            if field.is_free(p) {
                samples.push(p);
            }
        }
        debug!(samples = n, attempts, "sampling complete");
        Ok(samples)
    }
}
