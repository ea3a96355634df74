//! Human-readable byte sizes

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Formats a byte count as `B`, `KB` or `MB` (binary units, one decimal)
///
/// Negative values keep their sign so "saved" amounts can be shown when the
/// optimizer made a file larger.
pub fn format_bytes(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let magnitude = bytes.unsigned_abs() as f64;

    if magnitude < KIB {
        format!("{sign}{} B", bytes.unsigned_abs())
    } else if magnitude < MIB {
        format!("{sign}{:.1} KB", magnitude / KIB)
    } else {
        format!("{sign}{:.1} MB", magnitude / MIB)
    }
}
