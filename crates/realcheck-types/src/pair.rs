//! One round's stimulus

use crate::example::{SampledExample, Source};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Screen position of an example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Left,
    Right,
}

impl Slot {
    pub fn other(self) -> Self {
        match self {
            Slot::Left => Slot::Right,
            Slot::Right => Slot::Left,
        }
    }
}

/// Pair construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    #[error("expected a real example, got {0:?}")]
    NotReal(Source),

    #[error("expected a synthetic example, got {0:?}")]
    NotSynthetic(Source),

    #[error("both examples share the identifier {0}")]
    SameIdentifier(String),
}

/// A real and a synthetic example placed on opposite sides.
///
/// Invariants: exactly one side is tagged real, and the two sides never share
/// an identifier. Both hold for every value built through [`Pair::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    left: SampledExample,
    right: SampledExample,
}

impl Pair {
    pub fn new(
        real: SampledExample,
        synthetic: SampledExample,
        real_slot: Slot,
    ) -> Result<Self, PairError> {
        if real.source != Source::Real {
            return Err(PairError::NotReal(real.source));
        }
        if synthetic.source != Source::Synthetic {
            return Err(PairError::NotSynthetic(synthetic.source));
        }
        if real.id() == synthetic.id() {
            return Err(PairError::SameIdentifier(real.id().to_string()));
        }

        let (left, right) = match real_slot {
            Slot::Left => (real, synthetic),
            Slot::Right => (synthetic, real),
        };
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &SampledExample {
        &self.left
    }

    pub fn right(&self) -> &SampledExample {
        &self.right
    }

    pub fn at(&self, slot: Slot) -> &SampledExample {
        match slot {
            Slot::Left => &self.left,
            Slot::Right => &self.right,
        }
    }

    /// Slot holding the real example.
    pub fn real_slot(&self) -> Slot {
        if self.left.is_real() {
            Slot::Left
        } else {
            Slot::Right
        }
    }

    pub fn real(&self) -> &SampledExample {
        self.at(self.real_slot())
    }

    pub fn synthetic(&self) -> &SampledExample {
        self.at(self.real_slot().other())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::Example;
    use std::sync::Arc;

    fn real(id: &str) -> SampledExample {
        SampledExample::real(Arc::new(Example::new(id, vec![])))
    }

    fn synthetic(id: &str) -> SampledExample {
        SampledExample::synthetic(Arc::new(Example::new(id, vec![])))
    }

    #[test]
    fn test_placement_follows_real_slot() {
        let pair = Pair::new(real("r"), synthetic("s"), Slot::Right).unwrap();
        assert_eq!(pair.left().id().as_str(), "s");
        assert_eq!(pair.right().id().as_str(), "r");
        assert_eq!(pair.real_slot(), Slot::Right);
        assert_eq!(pair.real().id().as_str(), "r");
        assert_eq!(pair.synthetic().id().as_str(), "s");
    }

    #[test]
    fn test_rejects_mislabelled_sides() {
        assert_eq!(
            Pair::new(synthetic("a"), synthetic("b"), Slot::Left),
            Err(PairError::NotReal(Source::Synthetic))
        );
        assert_eq!(
            Pair::new(real("a"), real("b"), Slot::Left),
            Err(PairError::NotSynthetic(Source::Real))
        );
    }

    #[test]
    fn test_rejects_shared_identifier() {
        assert!(matches!(
            Pair::new(real("x"), synthetic("x"), Slot::Left),
            Err(PairError::SameIdentifier(id)) if id == "x"
        ));
    }
}
