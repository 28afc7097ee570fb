//! Query parameter clamping.
//!
//! Out-of-range input is never rejected. The leading integer of the value is
//! used (`"12abc"` is 12, `"1.5"` is 1); negatives become zero, values above
//! the limit become the limit, and a value with no leading digits falls back
//! to the endpoint default.

/// Parse an optional raw query value into `[0, max]`.
pub fn clamp_param(raw: Option<&str>, default: u64, max: u64) -> u64 {
    raw.and_then(leading_integer).unwrap_or(default).min(max)
}

/// Leading `[+-]?[0-9]+` of `s`, saturated into `u64` (negatives are 0).
fn leading_integer(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    if negative {
        return Some(0);
    }
    // Too large for u64 but still a number.
    Some(rest[..digits].parse().unwrap_or(u64::MAX))
}
