//! Small stateless helpers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, ViteError};

/// Split `items` into those matching `predicate` and the rest, preserving relative order.
pub fn partition<T>(
    items: impl IntoIterator<Item = T>,
    mut predicate: impl FnMut(&T) -> bool,
) -> (Vec<T>, Vec<T>) {
    let mut matched = Vec::new();
    let mut rest = Vec::new();

    for item in items {
        if predicate(&item) {
            matched.push(item);
        } else {
            rest.push(item);
        }
    }

    (matched, rest)
}

/// Generate an alphanumeric string of exactly `length` characters from OS randomness.
///
/// Bytes are base64 encoded with `/`, `+` and `=` stripped, so each round can come up short
/// and the loop keeps drawing until the requested length is reached.
pub fn random_str(length: usize) -> Result<String> {
    let mut output = String::with_capacity(length);

    while output.len() < length {
        let missing = length - output.len();
        let mut bytes = vec![0u8; missing.div_ceil(3) * 3];
        getrandom::fill(&mut bytes).map_err(|err| ViteError::Random(err.to_string()))?;

        let encoded = STANDARD.encode(&bytes);
        output.extend(
            encoded
                .chars()
                .filter(|c| !matches!(c, '/' | '+' | '='))
                .take(missing),
        );
    }

    Ok(output)
}
