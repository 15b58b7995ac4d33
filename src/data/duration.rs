use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to seconds multiplier, as the web UI prints durations
/// ("35 ms", "4 s", "1.2 min", "2.0 h"). Longer suffixes first.
const UNITS: &[(&str, f64)] = &[
    ("min", 60.0),
    ("ms", 0.001),
    ("s", 1.0),
    ("h", 3_600.0),
    ("d", 86_400.0),
];

/// Parse a duration cell of the task table.
pub fn parse_ui_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim().parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Invalid duration: {}", s);
            }
            return Ok(Duration::from_secs_f64(val * multiplier));
        }
    }

    bail!("Unknown duration format: {}", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes() {
        let d = parse_ui_duration("1.2 min").unwrap();
        assert!((d.as_secs_f64() - 72.0).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_ui_duration("35 ms").unwrap();
        assert_eq!(d.as_millis(), 35);
    }

    #[test]
    fn test_parse_seconds_and_hours() {
        assert_eq!(parse_ui_duration("4 s").unwrap().as_secs(), 4);
        assert_eq!(parse_ui_duration("2.0 h").unwrap().as_secs(), 7200);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_ui_duration("").is_err());
        assert!(parse_ui_duration("soon").is_err());
        assert!(parse_ui_duration("-3 s").is_err());
    }
}
