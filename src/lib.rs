//! One-time snapshot of host CPU characteristics: logical core count,
//! clock speed per core, model name, and total compute capacity.

pub mod app;
pub mod data;
pub mod error;
pub mod utils;

pub use data::cpu::{
    CpuInfoCache, CpuInfoRecord, CpuPlatform, CpuSnapshot, SysinfoPlatform, host_cpu,
};
pub use error::{CpuStatsError, InitError, Result};
