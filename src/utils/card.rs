// Utilitários para normalização de dados de cartão

/// Keeps only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Converts a stored expiry (`MM/YYYY` or `YYYY-MM`) to the gateway's `MMYY`.
/// Any other shape yields an empty string.
pub fn normalize_expiry(value: &str) -> String {
    if let Some((month, year)) = value.split_once('/') {
        if is_digits(month, 2) && is_digits(year, 4) {
            return format!("{}{}", month, &year[2..]);
        }
    } else if let Some((year, month)) = value.split_once('-') {
        if is_digits(year, 4) && is_digits(month, 2) {
            return format!("{}{}", month, &year[2..]);
        }
    }

    String::new()
}

fn is_digits(part: &str, len: usize) -> bool {
    part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
}
