//! Units formatting utilities
//!
//! Human-readable formatting of sizes, elapsed times and throughput for the
//! report lines and log output.

use std::time::Duration;

/// Format bytes into human-readable size with appropriate units
///
/// # Examples
/// ```
/// use iocompare::util::units::format_bytes;
///
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(4_000_000), "3.8 MiB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format an elapsed time as seconds with microsecond precision, the way the
/// timing lines report it.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use iocompare::util::units::format_seconds;
///
/// assert_eq!(format_seconds(Duration::from_millis(1500)), "1.500000");
/// ```
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.6}", duration.as_secs_f64())
}

/// Format duration into human-readable string
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use iocompare::util::units::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 3600 {
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if total_secs >= 60 {
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{}m {}s", minutes, seconds)
    } else if total_secs > 0 {
        if millis > 0 {
            format!("{}.{:02}s", total_secs, millis / 10)
        } else {
            format!("{}s", total_secs)
        }
    } else if millis > 0 {
        format!("{}ms", millis)
    } else {
        format!("{}μs", duration.as_micros())
    }
}

/// Format throughput value with appropriate units
///
/// # Examples
/// ```
/// use iocompare::util::units::format_throughput;
///
/// assert_eq!(format_throughput(1024.0), "1.0 GiB/s");
/// assert_eq!(format_throughput(1.5), "1.5 MiB/s");
/// ```
pub fn format_throughput(mibps: f64) -> String {
    if mibps >= 1024.0 {
        format!("{:.1} GiB/s", mibps / 1024.0)
    } else if mibps >= 1.0 {
        format!("{:.1} MiB/s", mibps)
    } else if mibps >= 0.001 {
        format!("{:.1} KiB/s", mibps * 1024.0)
    } else {
        format!("{:.3} MiB/s", mibps)
    }
}
