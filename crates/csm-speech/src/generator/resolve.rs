//! First-success-wins resolution of a generator handle.
//!
//! Resolution walks an ordered strategy list: local checkpoint, hosted
//! pretrained checkpoint, mock model, synthetic waveform. A failing tier is
//! logged and skipped; the synthetic terminal tier cannot fail, so the
//! cascade always yields a usable handle. The resolved handle is cached
//! process-wide in a [`ModelRegistry`] and reused by every later request.

use crate::error::{Result, SpeechError};
use crate::generator::GeneratorHandle;
use crate::generator::csm::{CsmGenerator, disable_graph_compile};
use crate::generator::mock::MockGenerator;
use crate::generator::synthetic::SyntheticGenerator;
use candle_core::Device;
use std::sync::{Arc, PoisonError, RwLock};

/// One constructor strategy in the cascade.
struct Strategy {
    name: &'static str,
    build: fn(&Device) -> Result<GeneratorHandle>,
}

fn local_checkpoint(device: &Device) -> Result<GeneratorHandle> {
    Ok(Arc::new(CsmGenerator::from_local(device)?))
}

fn hosted_pretrained(device: &Device) -> Result<GeneratorHandle> {
    Ok(Arc::new(CsmGenerator::from_hosted(device)?))
}

fn mock_model(device: &Device) -> Result<GeneratorHandle> {
    Ok(Arc::new(MockGenerator::new(device.clone())))
}

fn synthetic(_device: &Device) -> Result<GeneratorHandle> {
    Ok(Arc::new(SyntheticGenerator::new()))
}

const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "local checkpoint",
        build: local_checkpoint,
    },
    Strategy {
        name: "hosted pretrained",
        build: hosted_pretrained,
    },
    Strategy {
        name: "mock model",
        build: mock_model,
    },
    Strategy {
        name: "synthetic waveform",
        build: synthetic,
    },
];

fn run_cascade(strategies: &[Strategy], device: &Device) -> Result<GeneratorHandle> {
    for strategy in strategies {
        match (strategy.build)(device) {
            Ok(handle) => {
                log::info!("Resolved generator via the {} tier", strategy.name);
                return Ok(handle);
            }
            Err(e) => log::warn!("Generator tier '{}' unavailable: {e}", strategy.name),
        }
    }
    // Unreachable while the synthetic tier is in the list.
    Err(SpeechError::ModelLoad(
        "every generator tier failed".to_string(),
    ))
}

/// Run the full resolution cascade once.
///
/// Disables just-in-time graph compilation before the checkpoint tiers run.
/// Callers normally go through [`ModelRegistry::get_or_resolve`] instead, so
/// the result is cached for the process lifetime.
pub fn resolve_generator(device: &Device) -> Result<GeneratorHandle> {
    disable_graph_compile();
    run_cascade(STRATEGIES, device)
}

/// Process-wide cell holding the resolved generator handle.
///
/// Written once at resolution time (or lazily on the first request) and
/// read-only afterwards. Racing first-time callers may both run the cascade;
/// the chain is idempotent and the last assignment wins.
pub struct ModelRegistry {
    slot: RwLock<Option<GeneratorHandle>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Currently cached handle, if resolution has run.
    pub fn get(&self) -> Option<GeneratorHandle> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a generator has been resolved and cached.
    pub fn is_loaded(&self) -> bool {
        self.get().is_some()
    }

    /// Cached handle, or run the cascade and cache the result.
    pub fn get_or_resolve(&self, device: &Device) -> Result<GeneratorHandle> {
        if let Some(handle) = self.get() {
            return Ok(handle);
        }
        let handle = resolve_generator(device)?;
        self.install(handle.clone());
        Ok(handle)
    }

    /// Install a specific handle: pre-resolved models or test doubles.
    pub fn install(&self, handle: GeneratorHandle) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Drop the cached handle; the next request re-resolves.
    pub fn reset(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SpeechGenerator;

    fn failing(_device: &Device) -> Result<GeneratorHandle> {
        Err(SpeechError::ModelLoad("tier unavailable".to_string()))
    }

    #[test]
    fn cascade_skips_failing_tiers() {
        let strategies = [
            Strategy {
                name: "first",
                build: failing,
            },
            Strategy {
                name: "second",
                build: failing,
            },
            Strategy {
                name: "terminal",
                build: synthetic,
            },
        ];

        let handle = run_cascade(&strategies, &Device::Cpu).unwrap();
        assert_eq!(handle.name(), "synthetic");
    }

    #[test]
    fn exhausted_cascade_is_a_model_load_error() {
        let strategies = [Strategy {
            name: "only",
            build: failing,
        }];

        let err = run_cascade(&strategies, &Device::Cpu).unwrap_err();
        assert!(matches!(err, SpeechError::ModelLoad(_)));
    }

    #[test]
    fn registry_starts_empty() {
        let registry = ModelRegistry::new();
        assert!(!registry.is_loaded());
        assert!(registry.get().is_none());
    }

    #[test]
    fn installed_handle_is_returned_without_resolution() {
        let registry = ModelRegistry::new();
        registry.install(Arc::new(SyntheticGenerator::new()));
        assert!(registry.is_loaded());

        let handle = registry.get_or_resolve(&Device::Cpu).unwrap();
        assert_eq!(handle.name(), "synthetic");
    }

    #[test]
    fn reset_clears_the_cached_handle() {
        let registry = ModelRegistry::new();
        registry.install(Arc::new(SyntheticGenerator::new()));
        registry.reset();
        assert!(!registry.is_loaded());
    }

    #[test]
    #[ignore = "runs the full cascade; the hosted tier may attempt a download"]
    fn full_cascade_yields_a_handle() {
        let handle = resolve_generator(&Device::Cpu).unwrap();
        assert_eq!(handle.sample_rate(), 24_000);
    }
}
