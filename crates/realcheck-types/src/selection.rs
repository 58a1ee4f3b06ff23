//! Persisted round outcomes

use crate::ids::{ExampleId, UserId};
use crate::pair::{Pair, Slot};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one confirmed round. Created once, never modified.
///
/// The last three fields describe the synthetic example of the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    /// UTC, truncated to whole seconds to match the `TIMESTAMP` column.
    pub timestamp: NaiveDateTime,
    pub user_id: UserId,
    pub real_example_id: ExampleId,
    pub synthetic_example_id: ExampleId,
    pub selected_real: bool,
    pub model_id: String,
    pub instruct_lang: String,
    pub generation_method: String,
}

impl SelectionRecord {
    /// Build the record for `choice` on `pair`, stamped with the current time.
    pub fn from_choice(user_id: UserId, pair: &Pair, choice: Slot) -> Self {
        Self::from_choice_at(user_id, pair, choice, Utc::now().naive_utc())
    }

    pub fn from_choice_at(
        user_id: UserId,
        pair: &Pair,
        choice: Slot,
        timestamp: NaiveDateTime,
    ) -> Self {
        let real = pair.real();
        let synthetic = pair.synthetic();
        let metadata = synthetic.example.metadata.clone().unwrap_or_default();

        Self {
            timestamp: timestamp.trunc_subsecs(0),
            user_id,
            real_example_id: real.id().clone(),
            synthetic_example_id: synthetic.id().clone(),
            selected_real: choice == pair.real_slot(),
            model_id: metadata.model_id,
            instruct_lang: metadata.instruct_lang,
            generation_method: metadata.generation_method,
        }
    }
}

/// A selection record together with its store-assigned surrogate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSelection {
    pub id: i64,
    #[serde(flatten)]
    pub record: SelectionRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::example::{Example, GenerationMetadata, SampledExample};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn pair(real_slot: Slot) -> Pair {
        let real = SampledExample::real(Arc::new(Example::new("real-1", vec![])));
        let synthetic = SampledExample::synthetic(Arc::new(
            Example::new("syn-1", vec![]).with_metadata(GenerationMetadata {
                model_id: "gpt-4o".to_string(),
                instruct_lang: "de".to_string(),
                generation_method: "few-shot".to_string(),
            }),
        ));
        Pair::new(real, synthetic, real_slot).unwrap()
    }

    #[test]
    fn test_choosing_synthetic_slot_is_not_selected_real() {
        let record = SelectionRecord::from_choice(UserId::new("u"), &pair(Slot::Right), Slot::Left);
        assert!(!record.selected_real);
        assert_eq!(record.real_example_id.as_str(), "real-1");
        assert_eq!(record.synthetic_example_id.as_str(), "syn-1");
        assert_eq!(record.model_id, "gpt-4o");
        assert_eq!(record.instruct_lang, "de");
        assert_eq!(record.generation_method, "few-shot");
    }

    #[test]
    fn test_choosing_real_slot_is_selected_real() {
        let record = SelectionRecord::from_choice(UserId::new("u"), &pair(Slot::Left), Slot::Left);
        assert!(record.selected_real);
    }

    #[test]
    fn test_timestamp_truncated_to_seconds() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 15, 987)
            .unwrap();
        let record =
            SelectionRecord::from_choice_at(UserId::new("u"), &pair(Slot::Left), Slot::Right, at);
        assert_eq!(record.timestamp.to_string(), "2024-05-01 12:30:15");
    }
}
