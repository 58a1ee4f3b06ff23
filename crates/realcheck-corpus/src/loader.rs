//! Assembling a [`Corpus`] from its sources

use crate::corpus::Corpus;
use crate::error::{CorpusError, CorpusResult};
use crate::raw::RawCall;
use crate::source::DatasetSource;
use realcheck_types::Example;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Deserialize)]
struct CuratedFile {
    calls: Vec<RawCall>,
}

/// Read the curated pool file (`{"calls": [...]}`).
pub async fn load_curated(path: &Path) -> CorpusResult<Vec<Example>> {
    let configuration_err = |reason: String| CorpusError::Configuration {
        path: path.to_path_buf(),
        reason,
    };

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| configuration_err(e.to_string()))?;
    let file: CuratedFile =
        serde_json::from_str(&text).map_err(|e| configuration_err(e.to_string()))?;

    Ok(file.calls.into_iter().map(RawCall::into_real).collect())
}

/// Builds the three pools, degrading every failure to an empty pool.
pub struct CorpusLoader {
    real: Box<dyn DatasetSource>,
    synthetic: Box<dyn DatasetSource>,
    curated_path: Option<PathBuf>,
}

impl CorpusLoader {
    pub fn new(real: Box<dyn DatasetSource>, synthetic: Box<dyn DatasetSource>) -> Self {
        Self {
            real,
            synthetic,
            curated_path: None,
        }
    }

    pub fn with_curated_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.curated_path = Some(path.into());
        self
    }

    pub async fn load(&self) -> Corpus {
        let real: Vec<Example> = fetch_or_empty(self.real.as_ref())
            .await
            .into_iter()
            .map(RawCall::into_real)
            .collect();

        let raw_synthetic = fetch_or_empty(self.synthetic.as_ref()).await;
        let total_synthetic = raw_synthetic.len();
        let synthetic: Vec<Example> = raw_synthetic
            .into_iter()
            .filter_map(RawCall::into_synthetic)
            .collect();
        if synthetic.len() < total_synthetic {
            warn!(
                skipped = total_synthetic - synthetic.len(),
                "Skipped synthetic records without generation metadata"
            );
        }

        let curated = match &self.curated_path {
            Some(path) => match load_curated(path).await {
                Ok(curated) => curated,
                Err(err) => {
                    warn!(error = %err, "Curated pool unavailable, continuing without it");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let corpus = Corpus::new(real, synthetic, curated);
        info!(
            real = corpus.real_len(),
            synthetic = corpus.synthetic_len(),
            curated = corpus.curated_len(),
            "Corpus loaded"
        );
        corpus
    }
}

async fn fetch_or_empty(source: &dyn DatasetSource) -> Vec<RawCall> {
    match source.fetch().await {
        Ok(calls) => calls,
        Err(err) => {
            warn!(source = %source.describe(), error = %err, "Dataset unavailable, pool left empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonFileSource;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_all_pools() {
        let dir = tempfile::tempdir().unwrap();
        let real = write(
            dir.path(),
            "real.jsonl",
            "{\"call_id\": \"r1\", \"script\": []}\n{\"call_id\": \"r2\", \"script\": []}\n",
        );
        let synthetic = write(
            dir.path(),
            "synthetic.json",
            r#"[{"call_id": "s1", "model": "m", "instruct_lang": "de", "generation_method": "g"},
                {"call_id": "s2"}]"#,
        );
        let curated = write(
            dir.path(),
            "example_calls.json",
            r#"{"calls": [{"call_id": "c1", "script": [{"person": "agent", "text": "Hallo"}]}]}"#,
        );

        let corpus = CorpusLoader::new(
            Box::new(JsonFileSource::new(real)),
            Box::new(JsonFileSource::new(synthetic)),
        )
        .with_curated_path(curated)
        .load()
        .await;

        assert_eq!(corpus.real_len(), 2);
        assert_eq!(corpus.synthetic_len(), 1);
        assert_eq!(corpus.curated_len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_sources_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write(dir.path(), "example_calls.json", "{\"not_calls\": []}");

        let corpus = CorpusLoader::new(
            Box::new(JsonFileSource::new(dir.path().join("missing-real.json"))),
            Box::new(JsonFileSource::new(dir.path().join("missing-synthetic.json"))),
        )
        .with_curated_path(broken)
        .load()
        .await;

        assert_eq!(corpus.real_len(), 0);
        assert_eq!(corpus.synthetic_len(), 0);
        assert_eq!(corpus.curated_len(), 0);
    }

    #[tokio::test]
    async fn test_curated_errors_are_configuration_errors() {
        let err = load_curated(Path::new("/nonexistent/example_calls.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CorpusError::Configuration { .. }));
    }
}
