use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::types::CpuInfoRecord;
use crate::error::{CpuStatsError, Result};

/// Source of raw CPU facts for a [`super::CpuInfoCache`]
pub trait CpuPlatform: Send + Sync + 'static {
    /// Human-readable name of this platform source
    fn name(&self) -> &'static str;

    /// Number of cores; `logical` counts hyperthreads as separate cores
    fn core_count(&self, logical: bool) -> Result<usize>;

    /// One record per CPU package
    fn cpu_info(&self) -> Result<Vec<CpuInfoRecord>>;
}

/// Host platform backed by `sysinfo`, with /proc/cpuinfo on Linux
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoPlatform;

impl SysinfoPlatform {
    fn load_cpus() -> System {
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()))
    }

    /// Records with the clock each CPU reported when sampled
    fn sampled_records() -> Result<Vec<CpuInfoRecord>> {
        #[cfg(target_os = "linux")]
        {
            if let Some(records) = super::cpuinfo::read_cpuinfo()
                && !records.is_empty()
            {
                return Ok(records);
            }
        }

        let system = Self::load_cpus();
        let records = group_cpus(
            system
                .cpus()
                .iter()
                .map(|cpu| (cpu.brand(), cpu.vendor_id(), cpu.frequency())),
        );
        if records.is_empty() {
            return Err(CpuStatsError::platform("no CPUs reported"));
        }
        Ok(records)
    }
}

impl CpuPlatform for SysinfoPlatform {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn core_count(&self, logical: bool) -> Result<usize> {
        if !logical {
            return System::physical_core_count()
                .ok_or_else(|| CpuStatsError::platform("physical core count not reported"));
        }

        match Self::load_cpus().cpus().len() {
            0 => Err(CpuStatsError::platform("no CPUs reported")),
            count => Ok(count),
        }
    }

    fn cpu_info(&self) -> Result<Vec<CpuInfoRecord>> {
        #[allow(unused_mut)]
        let mut records = Self::sampled_records()?;

        #[cfg(target_os = "linux")]
        {
            super::cpuinfo::apply_max_freq(&mut records, super::cpuinfo::read_max_freq_mhz());
        }

        Ok(records)
    }
}

/// Collapse runs of identical (brand, vendor) CPUs into one record each
fn group_cpus<'a>(cpus: impl Iterator<Item = (&'a str, &'a str, u64)>) -> Vec<CpuInfoRecord> {
    let mut records: Vec<CpuInfoRecord> = Vec::new();

    for (brand, vendor, mhz) in cpus {
        if let Some(last) = records.last_mut()
            && last.model_name == brand.trim()
            && last.vendor_id == vendor.trim()
        {
            last.logical_cpus += 1;
            continue;
        }
        records.push(CpuInfoRecord {
            model_name: brand.trim().to_string(),
            vendor_id: vendor.trim().to_string(),
            physical_id: None,
            mhz: mhz as f64,
            logical_cpus: 1,
        });
    }

    records
}
