//! Conversion of duration display strings ("1:02:03", "4:30", "45") into
//! total seconds.

/// Parses a duration display string by collecting its maximal digit runs.
///
/// Runs map to (hours, minutes, seconds) right-aligned, so `"4:30"` is four
/// minutes thirty seconds and `"45"` is forty-five seconds. When more than
/// three runs appear, only the first three are used. A string with no digits
/// at all yields 0 rather than an error; extractors emit placeholders such as
/// "LIVE" for streams without a fixed length.
pub fn display_to_seconds(display: &str) -> u64 {
    let mut groups: Vec<u64> = Vec::new();
    let mut current = String::new();

    for c in display.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            groups.push(parse_group(&current));
            current.clear();
        }
    }
    if !current.is_empty() {
        groups.push(parse_group(&current));
    }

    let (hours, minutes, seconds) = match groups.as_slice() {
        [] => (0, 0, 0),
        [s] => (0, 0, *s),
        [m, s] => (0, *m, *s),
        [h, m, s, ..] => (*h, *m, *s),
    };

    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// A run too large for u64 falls back to 0, matching the zero-default policy
/// for entirely non-numeric input.
fn parse_group(run: &str) -> u64 {
    run.parse().unwrap_or(0)
}
