/// Smallest units per whole coin.
pub const COIN: i64 = 100_000_000;

/// Format an amount of smallest units as whole coins with 6 decimals.
/// Examples: "6.350000", "-0.000010"
pub fn format_coins(units: i64) -> String {
    format!("{:.6}", units as f64 / COIN as f64)
}

/// Convert a node-reported coin value (float) to smallest units.
pub fn coins_to_units(value: f64) -> i64 {
    (value * COIN as f64).round() as i64
}

/// Insert thousands separators: 1234567 -> "1,234,567"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a non-negative number of seconds as "{d}d HH:MM:SS".
pub fn format_dhms(secs: u64) -> String {
    let (m, s) = (secs / 60, secs % 60);
    let (h, m) = (m / 60, m % 60);
    let (d, h) = (h / 24, h % 24);
    format!("{d}d {h:02}:{m:02}:{s:02}")
}
