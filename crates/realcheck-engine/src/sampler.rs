use crate::error::EngineResult;
use rand::Rng;
use realcheck_corpus::Corpus;
use realcheck_types::{ExposureSet, Pair, Slot};
use std::sync::Arc;

/// Produces one balanced pair per round.
///
/// Sampling never touches the exposure set; a pair that is shown but never
/// confirmed does not count as exposure.
#[derive(Debug, Clone)]
pub struct PairSampler {
    corpus: Arc<Corpus>,
}

impl PairSampler {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Draw a real and a synthetic example and place them by a fair coin,
    /// independent of the coins used for drawing.
    pub fn next_pair<R: Rng + ?Sized>(
        &self,
        exposure: &ExposureSet,
        rng: &mut R,
    ) -> EngineResult<Pair> {
        let real = self.corpus.sample_real(exposure, rng)?;
        let synthetic = self.corpus.sample_synthetic(rng)?;
        let real_slot = if rng.gen_bool(0.5) {
            Slot::Left
        } else {
            Slot::Right
        };
        Ok(Pair::new(real, synthetic, real_slot)?)
    }
}
