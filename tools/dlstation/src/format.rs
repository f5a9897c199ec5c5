/// Unit suffixes for powers of 1024, largest last.
const UNITS: [char; 9] = ['B', 'k', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// Scale a byte count into a human-readable string.
///
/// Values below 10 after scaling keep one decimal place, everything else
/// rounds to an integer. Scaling stops at the largest defined suffix.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if value < 10.0 {
        format!("{:.1}{}", value, UNITS[unit])
    } else {
        format!("{}{}", value.round() as u64, UNITS[unit])
    }
}
