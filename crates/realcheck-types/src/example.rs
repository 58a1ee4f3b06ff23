//! Dialogue examples and source tags

use crate::ids::ExampleId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Who is speaking in a scripted utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    Other,
}

impl Speaker {
    /// Map a dataset `person` label; only "agent" (any case) is the agent.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("agent") {
            Speaker::Agent
        } else {
            Speaker::Other
        }
    }
}

/// One line of a dialogue script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: Speaker,
    pub text: String,
}

/// How a synthetic dialogue was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub model_id: String,
    pub instruct_lang: String,
    pub generation_method: String,
}

/// One scripted dialogue as stored in a pool.
///
/// Examples carry no source tag of their own; the tag is attached when an
/// example is drawn (see [`SampledExample`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: ExampleId,
    pub script: Vec<Utterance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<GenerationMetadata>,
}

impl Example {
    pub fn new(id: impl Into<ExampleId>, script: Vec<Utterance>) -> Self {
        Self {
            id: id.into(),
            script,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: GenerationMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Which corpus an example was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Real,
    Synthetic,
}

/// An example tagged with its source at sampling time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledExample {
    pub source: Source,
    pub example: Arc<Example>,
}

impl SampledExample {
    pub fn real(example: Arc<Example>) -> Self {
        Self {
            source: Source::Real,
            example,
        }
    }

    pub fn synthetic(example: Arc<Example>) -> Self {
        Self {
            source: Source::Synthetic,
            example,
        }
    }

    pub fn id(&self) -> &ExampleId {
        &self.example.id
    }

    pub fn is_real(&self) -> bool {
        self.source == Source::Real
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_from_label() {
        assert_eq!(Speaker::from_label("agent"), Speaker::Agent);
        assert_eq!(Speaker::from_label("AGENT"), Speaker::Agent);
        assert_eq!(Speaker::from_label(" Agent "), Speaker::Agent);
        assert_eq!(Speaker::from_label("customer"), Speaker::Other);
        assert_eq!(Speaker::from_label(""), Speaker::Other);
    }

    #[test]
    fn test_metadata_omitted_for_real_examples() {
        let example = Example::new("r1", vec![]);
        let json = serde_json::to_value(&example).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
