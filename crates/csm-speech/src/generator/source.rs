//! Checkpoint sources: a local directory or hosted hub repositories.

use std::path::PathBuf;

/// Hub repository holding the pretrained model weights.
pub const WEIGHTS_REPO: &str = "SesameAILabs/CSM-1B";

/// Hub repository holding the text tokenizer.
pub const TOKENIZER_REPO: &str = "meta-llama/Llama-3.2-1B";

const WEIGHTS_FILE: &str = "model.safetensors";
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Environment variable overriding the local checkpoint directory.
pub const MODEL_DIR_ENV: &str = "CSM_MODEL_DIR";

/// Files that make up a loadable checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointFiles {
    pub weights: PathBuf,
    pub tokenizer: PathBuf,
}

/// Where checkpoint files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A directory already on disk, weights and tokenizer side by side.
    LocalDir(PathBuf),
    /// Hosted hub repositories, fetched through the local hub cache.
    Hosted {
        weights_repo: String,
        tokenizer_repo: String,
    },
}

impl ModelSource {
    /// The default local checkpoint location: `$CSM_MODEL_DIR`, or the CSM
    /// directory under the user cache.
    pub fn local_default() -> Self {
        let dir = std::env::var(MODEL_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::cache_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("csm")
            });
        Self::LocalDir(dir)
    }

    /// The default hosted checkpoint repositories.
    pub fn hosted_default() -> Self {
        Self::Hosted {
            weights_repo: WEIGHTS_REPO.to_string(),
            tokenizer_repo: TOKENIZER_REPO.to_string(),
        }
    }

    /// Resolve the checkpoint files, downloading if the source is hosted.
    pub fn resolve(&self) -> Result<CheckpointFiles, SourceError> {
        match self {
            Self::LocalDir(dir) => {
                let weights = existing_file(dir.join(WEIGHTS_FILE))?;
                let tokenizer = existing_file(dir.join(TOKENIZER_FILE))?;
                Ok(CheckpointFiles { weights, tokenizer })
            }
            Self::Hosted {
                weights_repo,
                tokenizer_repo,
            } => {
                let api = hub_api()?;
                let weights = fetch(&api, weights_repo, WEIGHTS_FILE)?;
                let tokenizer = fetch(&api, tokenizer_repo, TOKENIZER_FILE)?;
                Ok(CheckpointFiles { weights, tokenizer })
            }
        }
    }
}

fn existing_file(path: PathBuf) -> Result<PathBuf, SourceError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(SourceError::MissingLocalFile(path))
    }
}

fn hub_api() -> Result<hf_hub::api::sync::Api, SourceError> {
    use hf_hub::Cache;
    use hf_hub::api::sync::ApiBuilder;

    let mut builder = ApiBuilder::from_cache(Cache::from_env());
    if let Ok(endpoint) = std::env::var("HF_ENDPOINT") {
        builder = builder.with_endpoint(endpoint);
    }
    if let Some(token) = hub_token() {
        builder = builder.with_token(Some(token));
    }
    builder
        .build()
        .map_err(|err| SourceError::Download(err.to_string()))
}

fn fetch(api: &hf_hub::api::sync::Api, repo_id: &str, filename: &str) -> Result<PathBuf, SourceError> {
    api.model(repo_id.to_string())
        .get(filename)
        .map_err(|err| SourceError::Download(format!("{repo_id}/{filename}: {err}")))
}

fn hub_token() -> Option<String> {
    std::env::var("HUGGINGFACE_HUB_TOKEN")
        .ok()
        .or_else(|| std::env::var("HF_TOKEN").ok())
        .or_else(|| std::env::var("HUGGINGFACE_TOKEN").ok())
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Checkpoint file not found: {0}")]
    MissingLocalFile(PathBuf),
    #[error("Checkpoint download failed: {0}")]
    Download(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_local_dir_fails_resolution() {
        let source = ModelSource::LocalDir(PathBuf::from("/nonexistent/csm-checkpoint"));
        let err = source.resolve().unwrap_err();
        assert!(matches!(err, SourceError::MissingLocalFile(_)));
    }

    #[test]
    fn local_dir_with_both_files_resolves() {
        let dir = tempfile::tempdir().unwrap();
        for name in [WEIGHTS_FILE, TOKENIZER_FILE] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            writeln!(file, "stub").unwrap();
        }

        let source = ModelSource::LocalDir(dir.path().to_path_buf());
        let files = source.resolve().unwrap();
        assert_eq!(files.weights, dir.path().join(WEIGHTS_FILE));
        assert_eq!(files.tokenizer, dir.path().join(TOKENIZER_FILE));
    }

    #[test]
    fn local_dir_missing_tokenizer_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join(WEIGHTS_FILE)).unwrap();

        let source = ModelSource::LocalDir(dir.path().to_path_buf());
        assert!(source.resolve().is_err());
    }

    #[test]
    fn hosted_default_points_at_pretrained_repos() {
        match ModelSource::hosted_default() {
            ModelSource::Hosted {
                weights_repo,
                tokenizer_repo,
            } => {
                assert_eq!(weights_repo, WEIGHTS_REPO);
                assert_eq!(tokenizer_repo, TOKENIZER_REPO);
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }
}
