pub mod cpu;

pub use cpu::{
    CpuInfoCache, CpuInfoRecord, CpuPlatform, CpuSnapshot, SysinfoPlatform, host_cpu,
};
