mod cache;
mod cpuinfo;
mod platform;
mod types;

pub use cache::{CpuInfoCache, DEFAULT_INFO_TIMEOUT};
pub use cpuinfo::parse_cpuinfo;
pub use platform::{CpuPlatform, SysinfoPlatform};
pub use types::{CpuInfoRecord, CpuSnapshot};

use std::sync::OnceLock;

use crate::error::InitError;

static HOST_CPU: OnceLock<CpuInfoCache> = OnceLock::new();

/// Process-wide cache for the host CPU (not queried until [`init`])
pub fn host_cpu() -> &'static CpuInfoCache {
    HOST_CPU.get_or_init(CpuInfoCache::host)
}

/// Initialize the process-wide cache; safe to call any number of times
pub fn init() -> Result<(), InitError> {
    host_cpu().init()
}

pub fn num_cores() -> usize {
    host_cpu().num_cores()
}

pub fn mhz_per_core() -> f64 {
    host_cpu().mhz_per_core()
}

pub fn model_name() -> &'static str {
    host_cpu().model_name()
}

/// Total MHz available across all cores of the host
pub fn total_ticks_available() -> f64 {
    host_cpu().total_ticks_available()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sole user of the process-wide cache in the test binary
    #[test]
    fn host_surface_before_and_after_init() {
        assert!(!host_cpu().is_initialized());
        assert_eq!(num_cores(), 0);
        assert_eq!(mhz_per_core(), 0.0);
        assert_eq!(model_name(), "");
        assert_eq!(total_ticks_available(), 0.0);

        let first = init();
        let second = init();
        assert_eq!(first, second);

        assert!(host_cpu().is_initialized());
        assert!(total_ticks_available() >= 1.0);
        assert_eq!(host_cpu().snapshot().map(|s| s.num_cores), Some(num_cores()));
    }
}
