//! Raw dataset records
//!
//! Both datasets and the curated file share one record shape:
//! `call_id`, `script` (a list of `{person, text}` turns) and, for synthetic
//! records, `model`, `instruct_lang` and `generation_method`.

use realcheck_types::{Example, GenerationMetadata, Speaker, Utterance};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One dialogue as it appears in a dataset row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCall {
    #[serde(deserialize_with = "loose_string")]
    pub call_id: String,
    #[serde(default)]
    pub script: Vec<RawTurn>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub instruct_lang: Option<String>,
    #[serde(default)]
    pub generation_method: Option<String>,
}

/// One turn of a raw script.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTurn {
    #[serde(default, deserialize_with = "loose_string")]
    pub person: String,
    #[serde(default)]
    pub text: String,
}

impl RawCall {
    fn script(&self) -> Vec<Utterance> {
        self.script
            .iter()
            .map(|turn| Utterance {
                speaker: Speaker::from_label(&turn.person),
                text: turn.text.clone(),
            })
            .collect()
    }

    /// Convert to a pool example, ignoring any generation metadata.
    pub fn into_real(self) -> Example {
        let script = self.script();
        Example::new(self.call_id, script)
    }

    /// Convert to a synthetic example. Returns `None` when any of the three
    /// generation fields is missing.
    pub fn into_synthetic(self) -> Option<Example> {
        let script = self.script();
        let metadata = GenerationMetadata {
            model_id: self.model?,
            instruct_lang: self.instruct_lang?,
            generation_method: self.generation_method?,
        };
        Some(Example::new(self.call_id, script).with_metadata(metadata))
    }
}

/// Accept strings, numbers, booleans or null and keep their text form.
fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
