use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};

const SECRET_BYTES: usize = 16;
const OBJECT_ID_LEN: usize = 24;

/// Random hex secret, used as the per-school admin password when none is given.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// 24-hex identifier: 4-byte big-endian unix seconds followed by 8 random bytes.
pub fn new_object_id() -> String {
    let mut bytes = [0u8; 12];
    let seconds = utc_now().timestamp().clamp(0, u32::MAX as i64) as u32;
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    OsRng.fill_bytes(&mut bytes[4..]);
    hex::encode(bytes)
}

/// Whether `raw` has the store's identifier shape: 24 hex characters.
pub fn is_object_id(raw: &str) -> bool {
    raw.len() == OBJECT_ID_LEN && raw.chars().all(|c| c.is_ascii_hexdigit())
}

/// Canonical form of an identifier: trimmed and lowercased, or `None` when malformed.
pub fn normalize_object_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    is_object_id(trimmed).then(|| trimmed.to_ascii_lowercase())
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Trims and drops empty strings from optional text input.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_ids_are_24_hex_and_unique() {
        let a = new_object_id();
        let b = new_object_id();
        assert_eq!(a.len(), 24);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn object_id_shape() {
        assert!(is_object_id("64b1f0a2c3d4e5f601234567"));
        assert!(!is_object_id("64b1f0a2c3d4e5f60123456"));
        assert!(!is_object_id("64b1f0a2c3d4e5f60123456g"));
    }

    #[test]
    fn normalized_ids_are_lowercase() {
        assert_eq!(
            normalize_object_id(" 64B1F0A2C3D4E5F601234567 ").as_deref(),
            Some("64b1f0a2c3d4e5f601234567")
        );
        assert_eq!(normalize_object_id("not-an-id"), None);
    }

    #[test]
    fn generated_secret_is_32_hex_chars() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 32);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn non_empty_trims_blank_values() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" x ")), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
