/// Parse a compact unit-suffixed duration like "1d", "2h30m" or "45s" into
/// seconds. Units are `d`, `h`, `m`, `s`; digit/unit pairs are summed.
///
/// Quirk kept from the original command grammar: unrecognized characters are
/// skipped in place, so pending digits carry across them ("3x0m" parses as
/// 30 minutes). A string with no valid digit+unit pair parses to zero, which
/// callers must reject.
pub fn parse_duration(input: &str) -> u64 {
    let mut total: u64 = 0;
    let mut digits = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if let Some(unit) = unit_seconds(ch) {
            if !digits.is_empty() {
                let n = digits.parse::<u64>().unwrap_or(u64::MAX);
                total = total.saturating_add(n.saturating_mul(unit));
                digits.clear();
            }
        }
    }

    total
}

fn unit_seconds(ch: char) -> Option<u64> {
    match ch {
        'd' => Some(86_400),
        'h' => Some(3_600),
        'm' => Some(60),
        's' => Some(1),
        _ => None,
    }
}
