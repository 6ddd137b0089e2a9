//! Chilean RUT (national identity number) checksum validation.
//!
//! Input is normalized by dropping everything that is not a digit or `k`/`K`,
//! so `12.345.678-5`, `12345678-5` and `123456785` are equivalent. The last
//! character is the check digit, computed with the modulo-11 scheme over the
//! body using weights 2..=7 cycling from the rightmost digit.

// ---

/// Keep only digits and `K`, uppercased.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Expected check character for a numeric body, or `None` when the body is
/// empty or contains anything other than ASCII digits.
pub fn check_digit(body: &str) -> Option<char> {
    // ---
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u64 = body
        .bytes()
        .rev()
        .zip((2..=7).cycle())
        .map(|(digit, weight)| u64::from(digit - b'0') * weight)
        .sum();

    match 11 - sum % 11 {
        11 => Some('0'),
        10 => Some('K'),
        n => char::from_digit(n as u32, 10),
    }
}

/// Whether `raw` is a RUT with a correct check digit. Never panics; every
/// malformed input is simply `false`.
pub fn validate_identity_number(raw: &str) -> bool {
    // ---
    let normalized = normalize(raw);
    if normalized.len() < 2 {
        return false;
    }

    // normalized is pure ASCII, so byte slicing is on char boundaries
    let (body, dv) = normalized.split_at(normalized.len() - 1);
    let valid = dv.chars().next().is_some_and(|dv| check_digit(body) == Some(dv));

    if !valid {
        tracing::debug!("Rejected identity number (normalized: {})", normalized);
    }
    valid
}
