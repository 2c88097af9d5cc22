use super::types::CpuInfoRecord;

#[cfg(target_os = "linux")]
const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Read per-socket records from /proc/cpuinfo, `None` if unreadable
#[cfg(target_os = "linux")]
pub(crate) fn read_cpuinfo() -> Option<Vec<CpuInfoRecord>> {
    let content = std::fs::read_to_string(CPUINFO_PATH).ok()?;
    Some(parse_cpuinfo(&content))
}

#[cfg(target_os = "linux")]
const MAX_FREQ_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";

/// Rated maximum clock of cpu0 in MHz, `None` without cpufreq
#[cfg(target_os = "linux")]
pub(crate) fn read_max_freq_mhz() -> Option<f64> {
    let content = std::fs::read_to_string(MAX_FREQ_PATH).ok()?;
    parse_khz_as_mhz(&content)
}

/// cpufreq files hold kHz; zero means the driver does not know
#[cfg(any(target_os = "linux", test))]
fn parse_khz_as_mhz(content: &str) -> Option<f64> {
    let khz = content.split_whitespace().next()?.parse::<u64>().ok()?;
    if khz == 0 { None } else { Some(khz as f64 / 1000.0) }
}

/// Replace sampled clocks with the rated maximum, which does not move with
/// power management
#[cfg(any(target_os = "linux", test))]
pub(crate) fn apply_max_freq(records: &mut [CpuInfoRecord], max_mhz: Option<f64>) {
    let Some(max_mhz) = max_mhz else {
        return;
    };
    for record in records {
        record.mhz = max_mhz;
    }
}

#[derive(Default)]
struct Block {
    model_name: Option<String>,
    vendor_id: Option<String>,
    physical_id: Option<u32>,
    mhz: Option<f64>,
}

impl Block {
    fn is_empty(&self) -> bool {
        self.model_name.is_none()
            && self.vendor_id.is_none()
            && self.physical_id.is_none()
            && self.mhz.is_none()
    }
}

/// Parse /proc/cpuinfo text into one record per physical package.
///
/// Processor blocks sharing a `physical id` are merged; the first block of
/// each package supplies its model name and clock. Blocks with no
/// `physical id` all merge into a single `None` record.
pub fn parse_cpuinfo(content: &str) -> Vec<CpuInfoRecord> {
    let mut records: Vec<CpuInfoRecord> = Vec::new();
    let mut block = Block::default();

    for line in content.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            let finished = std::mem::take(&mut block);
            if !finished.is_empty() {
                merge_block(&mut records, finished);
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            // ARM kernels report "Processor" or "model name" depending on version
            "model name" | "Processor" if block.model_name.is_none() => {
                block.model_name = Some(value.to_string());
            }
            "vendor_id" | "CPU implementer" if block.vendor_id.is_none() => {
                block.vendor_id = Some(value.to_string());
            }
            "physical id" => block.physical_id = value.parse().ok(),
            "cpu MHz" => block.mhz = value.parse().ok(),
            _ => {}
        }
    }

    records
}

fn merge_block(records: &mut Vec<CpuInfoRecord>, block: Block) {
    if let Some(existing) = records
        .iter_mut()
        .find(|record| record.physical_id == block.physical_id)
    {
        existing.logical_cpus += 1;
        return;
    }

    records.push(CpuInfoRecord {
        model_name: block.model_name.unwrap_or_default(),
        vendor_id: block.vendor_id.unwrap_or_default(),
        physical_id: block.physical_id,
        mhz: block.mhz.unwrap_or(0.0),
        logical_cpus: 1,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SOCKETS: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
physical id\t: 0
cpu MHz\t\t: 2399.768

processor\t: 1
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
physical id\t: 0
cpu MHz\t\t: 1200.000

processor\t: 2
vendor_id\t: GenuineIntel
model name\t: Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz
physical id\t: 1
cpu MHz\t\t: 2401.112
";

    #[test]
    fn groups_blocks_by_physical_id() {
        let records = parse_cpuinfo(TWO_SOCKETS);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].physical_id, Some(0));
        assert_eq!(records[0].logical_cpus, 2);
        assert_eq!(records[0].mhz, 2399.768);
        assert_eq!(records[0].vendor_id, "GenuineIntel");
        assert_eq!(
            records[0].model_name,
            "Intel(R) Xeon(R) CPU E5-2680 v4 @ 2.40GHz"
        );
        assert_eq!(records[1].physical_id, Some(1));
        assert_eq!(records[1].logical_cpus, 1);
    }

    #[test]
    fn blocks_without_physical_id_merge() {
        let content = "\
processor\t: 0
model name\t: ARMv8 Processor rev 1 (v8l)
CPU implementer\t: 0x41

processor\t: 1
model name\t: ARMv8 Processor rev 1 (v8l)
CPU implementer\t: 0x41
";
        let records = parse_cpuinfo(content);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].physical_id, None);
        assert_eq!(records[0].logical_cpus, 2);
        assert_eq!(records[0].mhz, 0.0);
        assert_eq!(records[0].vendor_id, "0x41");
    }

    #[test]
    fn trailing_block_without_blank_line_is_kept() {
        let records = parse_cpuinfo("model name : Example CPU\ncpu MHz : 1000.5");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].model_name, "Example CPU");
        assert_eq!(records[0].mhz, 1000.5);
    }

    #[test]
    fn ignores_unrelated_sections() {
        let content = "\
Hardware\t: BCM2835
Revision\t: a02082
";
        assert!(parse_cpuinfo(content).is_empty());
        assert!(parse_cpuinfo("").is_empty());
    }

    #[test]
    fn parse_khz_as_mhz_values() {
        assert_eq!(parse_khz_as_mhz("3600000\n"), Some(3600.0));
        assert_eq!(parse_khz_as_mhz("2399768"), Some(2399.768));
        assert_eq!(parse_khz_as_mhz("0\n"), None);
        assert_eq!(parse_khz_as_mhz(""), None);
        assert_eq!(parse_khz_as_mhz("<unknown>"), None);
    }

    #[test]
    fn max_freq_replaces_sampled_clock() {
        let mut records = parse_cpuinfo(TWO_SOCKETS);
        apply_max_freq(&mut records, Some(3300.0));
        assert!(records.iter().all(|record| record.mhz == 3300.0));

        let mut records = parse_cpuinfo(TWO_SOCKETS);
        apply_max_freq(&mut records, None);
        assert_eq!(records[0].mhz, 2399.768);
        assert_eq!(records[1].mhz, 2401.112);
    }

    #[test]
    fn bad_mhz_value_is_zero() {
        let records = parse_cpuinfo("model name : X\ncpu MHz : n/a\n");
        assert_eq!(records[0].mhz, 0.0);
    }
}
