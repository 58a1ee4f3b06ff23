use crate::error::{Pool, SamplingError};
use rand::seq::SliceRandom;
use rand::Rng;
use realcheck_types::{Example, ExampleId, ExposureSet, SampledExample};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only example pools.
///
/// The synthetic pool is kept disjoint from the real and curated pools by
/// identifier, so a real and a synthetic draw never collide.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    real: Vec<Arc<Example>>,
    synthetic: Vec<Arc<Example>>,
    curated: Vec<Arc<Example>>,
    curated_ids: HashSet<ExampleId>,
}

impl Corpus {
    pub fn new(real: Vec<Example>, synthetic: Vec<Example>, curated: Vec<Example>) -> Self {
        let mut curated_ids = HashSet::new();
        let curated: Vec<Arc<Example>> = curated
            .into_iter()
            .filter(|example| curated_ids.insert(example.id.clone()))
            .map(Arc::new)
            .collect();

        let real_ids: HashSet<&ExampleId> = real.iter().map(|e| &e.id).collect();
        let mut dropped = 0usize;
        let synthetic: Vec<Arc<Example>> = synthetic
            .into_iter()
            .filter(|example| {
                let collides = real_ids.contains(&example.id) || curated_ids.contains(&example.id);
                if collides {
                    dropped += 1;
                }
                !collides
            })
            .map(Arc::new)
            .collect();
        if dropped > 0 {
            warn!(dropped, "Dropped synthetic examples sharing an id with real examples");
        }

        let real = real.into_iter().map(Arc::new).collect();

        Self {
            real,
            synthetic,
            curated,
            curated_ids,
        }
    }

    pub fn real_len(&self) -> usize {
        self.real.len()
    }

    pub fn synthetic_len(&self) -> usize {
        self.synthetic.len()
    }

    /// Size `K` of the curated pool.
    pub fn curated_len(&self) -> usize {
        self.curated.len()
    }

    pub fn is_curated(&self, id: &ExampleId) -> bool {
        self.curated_ids.contains(id)
    }

    /// Curated examples not yet in `exposure`.
    pub fn remaining_curated(&self, exposure: &ExposureSet) -> usize {
        self.curated
            .iter()
            .filter(|example| !exposure.contains(&example.id))
            .count()
    }

    /// Draw one real example.
    ///
    /// An unbiased coin decides between the curated pool (restricted to
    /// members not in `excluding`) and the general real pool. The general
    /// pool is used whenever the coin says so or no curated member remains.
    pub fn sample_real<R: Rng + ?Sized>(
        &self,
        excluding: &ExposureSet,
        rng: &mut R,
    ) -> Result<SampledExample, SamplingError> {
        if self.real.is_empty() {
            return Err(SamplingError::EmptyCorpus(Pool::Real));
        }

        let prefer_curated = rng.gen_bool(0.5);
        if prefer_curated {
            let remaining: Vec<&Arc<Example>> = self
                .curated
                .iter()
                .filter(|example| !excluding.contains(&example.id))
                .collect();
            if let Some(example) = remaining.choose(rng) {
                debug!(example_id = %example.id, remaining = remaining.len(), "Sampled curated example");
                return Ok(SampledExample::real(Arc::clone(example)));
            }
        }

        let example = self
            .real
            .choose(rng)
            .ok_or(SamplingError::EmptyCorpus(Pool::Real))?;
        debug!(example_id = %example.id, prefer_curated, "Sampled general real example");
        Ok(SampledExample::real(Arc::clone(example)))
    }

    /// Draw one synthetic example uniformly.
    pub fn sample_synthetic<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SampledExample, SamplingError> {
        self.synthetic
            .choose(rng)
            .map(|example| SampledExample::synthetic(Arc::clone(example)))
            .ok_or(SamplingError::EmptyCorpus(Pool::Synthetic))
    }
}
