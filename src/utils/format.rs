pub fn format_freq(mhz: f64) -> String {
    if mhz <= 0.0 {
        "unknown".to_string()
    } else if mhz >= 1000.0 {
        format!("{:.2} GHz", mhz / 1000.0)
    } else {
        format!("{mhz:.0} MHz")
    }
}

/// Total ticks are MHz summed over cores; a lone tick means unknown
pub fn format_ticks(ticks: f64) -> String {
    if ticks <= 1.0 {
        return "unknown".to_string();
    }
    format!("{} MHz", format_count(ticks as u64))
}

/// Thousands separated with commas
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_freq_units() {
        assert_eq!(format_freq(0.0), "unknown");
        assert_eq!(format_freq(800.0), "800 MHz");
        assert_eq!(format_freq(2399.0), "2.40 GHz");
    }

    #[test]
    fn format_ticks_marks_fallback_as_unknown() {
        assert_eq!(format_ticks(1.0), "unknown");
        assert_eq!(format_ticks(19192.0), "19,192 MHz");
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
