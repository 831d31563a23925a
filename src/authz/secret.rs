use sha2::{Digest, Sha256};

/// Compares a presented credential against a configured secret without an
/// early exit on the first differing byte. Both sides are digested first so
/// the comparison runs over equal-length inputs.
pub fn secrets_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());

    let diff = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    diff == 0
}
