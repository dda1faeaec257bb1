//! Resident-set sampling for the end-of-run summary. Best effort: returns
//! `None` on platforms without a procfs.

#[cfg(target_os = "linux")]
pub fn resident_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let vm_rss_kb = status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<f64>().ok())?;
    Some(vm_rss_kb / 1024.0)
}

#[cfg(not(target_os = "linux"))]
pub fn resident_mb() -> Option<f64> {
    None
}

/// Growth in resident memory since `start_mb`, when both samples resolved.
pub fn delta_mb(start_mb: Option<f64>) -> Option<f64> {
    match (start_mb, resident_mb()) {
        (Some(start), Some(end)) => Some(end - start),
        _ => None,
    }
}
