//! Compute backend selection.

use candle_core::Device;

/// Pick the compute backend, probing CUDA, then Metal, then CPU.
///
/// CPU is always assumed available, so selection never fails. A backend that
/// reports available but fails to initialize is skipped.
pub fn select_device() -> Device {
    if candle_core::utils::cuda_is_available() {
        match Device::new_cuda(0) {
            Ok(device) => {
                log::info!("Using CUDA device");
                return device;
            }
            Err(e) => log::warn!("CUDA available but failed to initialize: {e}"),
        }
    }

    if candle_core::utils::metal_is_available() {
        match Device::new_metal(0) {
            Ok(device) => {
                log::info!("Using Metal device");
                return device;
            }
            Err(e) => log::warn!("Metal available but failed to initialize: {e}"),
        }
    }

    log::info!("Using CPU device");
    Device::Cpu
}
