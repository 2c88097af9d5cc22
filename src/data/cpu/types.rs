use serde::Serialize;

/// One physical CPU package as reported by the platform
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CpuInfoRecord {
    pub model_name: String,
    pub vendor_id: String,
    /// Socket id, when the platform exposes one
    pub physical_id: Option<u32>,
    /// Clock speed in MHz, possibly fractional
    pub mhz: f64,
    /// Logical CPUs seen on this package
    pub logical_cpus: usize,
}

/// Normalized CPU values, written once by [`super::CpuInfoCache::init`]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CpuSnapshot {
    pub num_cores: usize,
    pub mhz_per_core: f64,
    pub model_name: String,
    pub total_ticks: f64,
}

impl CpuSnapshot {
    /// Build a snapshot from raw query results.
    ///
    /// Only the first record is used; sockets are assumed homogeneous.
    pub fn from_raw(num_cores: usize, records: &[CpuInfoRecord]) -> Self {
        let (model_name, raw_mhz) = records
            .first()
            .map(|record| (record.model_name.clone(), record.mhz))
            .unwrap_or_default();

        // Floor so machines with near-identical clocks land in the same class
        let mhz_per_core = if raw_mhz.is_finite() {
            raw_mhz.floor()
        } else {
            0.0
        };
        let mut total_ticks = (num_cores as f64 * mhz_per_core).floor();

        // Frequency unknown on this host: another detector fills it in later
        if total_ticks.is_nan() || total_ticks <= 0.0 {
            total_ticks = 1.0;
        }

        Self {
            num_cores,
            mhz_per_core,
            model_name,
            total_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(model: &str, mhz: f64) -> CpuInfoRecord {
        CpuInfoRecord {
            model_name: model.to_string(),
            mhz,
            ..Default::default()
        }
    }

    #[test]
    fn floors_mhz_and_ticks() {
        let snapshot = CpuSnapshot::from_raw(8, &[record("Example CPU", 2399.7)]);
        assert_eq!(snapshot.num_cores, 8);
        assert_eq!(snapshot.mhz_per_core, 2399.0);
        assert_eq!(snapshot.model_name, "Example CPU");
        assert_eq!(snapshot.total_ticks, 19192.0);
    }

    #[test]
    fn flooring_holds_across_values() {
        for (cores, mhz) in [(1, 0.99), (3, 1000.5), (16, 3600.999), (64, 2250.01)] {
            let snapshot = CpuSnapshot::from_raw(cores, &[record("x", mhz)]);
            assert_eq!(snapshot.mhz_per_core, f64::floor(mhz));
            let expected = (cores as f64 * f64::floor(mhz)).floor();
            assert_eq!(snapshot.total_ticks, expected.max(1.0));
        }
    }

    #[test]
    fn zero_frequency_falls_back_to_one_tick() {
        let snapshot = CpuSnapshot::from_raw(4, &[record("Virtual CPU", 0.0)]);
        assert_eq!(snapshot.num_cores, 4);
        assert_eq!(snapshot.mhz_per_core, 0.0);
        assert_eq!(snapshot.total_ticks, 1.0);
    }

    #[test]
    fn missing_everything_still_reports_one_tick() {
        let snapshot = CpuSnapshot::from_raw(0, &[]);
        assert_eq!(snapshot.model_name, "");
        assert_eq!(snapshot.mhz_per_core, 0.0);
        assert_eq!(snapshot.total_ticks, 1.0);
    }

    #[test]
    fn non_finite_mhz_is_treated_as_unknown() {
        let snapshot = CpuSnapshot::from_raw(2, &[record("odd", f64::NAN)]);
        assert_eq!(snapshot.mhz_per_core, 0.0);
        assert_eq!(snapshot.total_ticks, 1.0);
    }

    #[test]
    fn uses_first_record_only() {
        let snapshot =
            CpuSnapshot::from_raw(4, &[record("Socket Zero", 2000.0), record("Socket One", 3000.0)]);
        assert_eq!(snapshot.model_name, "Socket Zero");
        assert_eq!(snapshot.total_ticks, 8000.0);
    }
}
