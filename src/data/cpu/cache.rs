use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::debug;

use super::platform::{CpuPlatform, SysinfoPlatform};
use super::types::CpuSnapshot;
use crate::error::{CpuStatsError, InitError};
use crate::utils::run_with_deadline;

/// Upper bound on the CPU info query; some platforms are slow to answer
pub const DEFAULT_INFO_TIMEOUT: Duration = Duration::from_secs(60);

struct Initialized {
    snapshot: CpuSnapshot,
    outcome: Result<(), InitError>,
}

/// Write-once store of host CPU facts.
///
/// The platform is queried the first time [`CpuInfoCache::init`] runs and
/// never again. Accessors read the stored values without locking and return
/// zero values until initialization has finished.
pub struct CpuInfoCache {
    platform: Arc<dyn CpuPlatform>,
    info_timeout: Duration,
    state: OnceLock<Initialized>,
}

impl CpuInfoCache {
    pub fn new(platform: Arc<dyn CpuPlatform>) -> Self {
        Self::with_timeout(platform, DEFAULT_INFO_TIMEOUT)
    }

    pub fn with_timeout(platform: Arc<dyn CpuPlatform>, info_timeout: Duration) -> Self {
        Self {
            platform,
            info_timeout,
            state: OnceLock::new(),
        }
    }

    /// Cache backed by the host's own CPU facilities
    pub fn host() -> Self {
        Self::new(Arc::new(SysinfoPlatform))
    }

    /// Query and store CPU facts once; every call returns that one outcome.
    ///
    /// Concurrent callers block until the first caller's query finishes.
    pub fn init(&self) -> Result<(), InitError> {
        self.state.get_or_init(|| self.populate()).outcome.clone()
    }

    fn populate(&self) -> Initialized {
        let mut errors = InitError::new();
        let platform_name = self.platform.name();

        // A panicking platform must not leave the cache unset
        let core_query = panic::catch_unwind(AssertUnwindSafe(|| self.platform.core_count(true)))
            .unwrap_or_else(|_| {
                Err(CpuStatsError::platform(
                    "core count query panicked before returning",
                ))
            });
        let num_cores = match core_query {
            Ok(count) => count,
            Err(err) => {
                debug!(platform = platform_name, error = %err, "core count query failed");
                errors.push(CpuStatsError::core_count(err));
                0
            }
        };

        let platform = Arc::clone(&self.platform);
        let records = match run_with_deadline(self.info_timeout, move || platform.cpu_info()) {
            Ok(records) => records,
            Err(err) => {
                debug!(platform = platform_name, error = %err, "cpu info query failed");
                errors.push(CpuStatsError::cpu_info(err));
                Vec::new()
            }
        };

        let snapshot = CpuSnapshot::from_raw(num_cores, &records);
        debug!(
            platform = platform_name,
            num_cores = snapshot.num_cores,
            mhz_per_core = snapshot.mhz_per_core,
            model_name = %snapshot.model_name,
            total_ticks = snapshot.total_ticks,
            failures = errors.len(),
            "cpu info cache initialized"
        );

        Initialized {
            snapshot,
            outcome: errors.into_result(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// Stored values, `None` before initialization
    pub fn snapshot(&self) -> Option<&CpuSnapshot> {
        self.state.get().map(|state| &state.snapshot)
    }

    pub fn info_timeout(&self) -> Duration {
        self.info_timeout
    }

    pub fn num_cores(&self) -> usize {
        self.snapshot().map_or(0, |s| s.num_cores)
    }

    pub fn mhz_per_core(&self) -> f64 {
        self.snapshot().map_or(0.0, |s| s.mhz_per_core)
    }

    pub fn model_name(&self) -> &str {
        self.snapshot().map_or("", |s| s.model_name.as_str())
    }

    /// Total MHz across all cores; at least 1 once initialized
    pub fn total_ticks_available(&self) -> f64 {
        self.snapshot().map_or(0.0, |s| s.total_ticks)
    }
}

impl Default for CpuInfoCache {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Debug for CpuInfoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuInfoCache")
            .field("platform", &self.platform.name())
            .field("info_timeout", &self.info_timeout)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
