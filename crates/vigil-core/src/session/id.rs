//! Session identifier scheme.
//!
//! Session ids are 24-character lowercase hex strings, a shape inherited
//! from the upstream document store's identifier scheme. The first four
//! bytes encode the creation time in unix seconds, so lexicographic order
//! roughly follows creation order; the remaining eight bytes are random.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::{Result, VigilError};

/// Length of a session id in hex characters.
pub const SESSION_ID_LEN: usize = 24;

/// Generates a fresh session id for the given creation instant.
pub fn generate(now: DateTime<Utc>) -> String {
    let secs = now.timestamp().max(0) as u32;
    let mut entropy = [0u8; 8];
    rand::thread_rng().fill(&mut entropy);

    let mut id = String::with_capacity(SESSION_ID_LEN);
    for byte in secs.to_be_bytes().iter().chain(entropy.iter()) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

/// Validates the shape of a session id.
///
/// Every endpoint taking a session id must call this before querying the
/// store, so malformed ids surface as validation failures rather than
/// storage errors.
pub fn validate(id: &str) -> Result<()> {
    if id.len() == SESSION_ID_LEN && id.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(VigilError::validation("Invalid session ID format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_validate() {
        let id = generate(Utc::now());
        assert_eq!(id.len(), SESSION_ID_LEN);
        validate(&id).unwrap();
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let now = Utc::now();
        assert_ne!(generate(now), generate(now));
    }

    #[test]
    fn test_generated_ids_order_by_creation_time() {
        let earlier = generate("2024-01-01T00:00:00Z".parse().unwrap());
        let later = generate("2024-06-01T00:00:00Z".parse().unwrap());
        assert!(earlier[..8] < later[..8]);
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(validate("").is_err());
        assert!(validate("abc123").is_err());
        // Correct length, non-hex character
        assert!(validate("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        // One character short
        assert!(validate("0123456789abcdef0123456").is_err());
        // Uppercase hex is accepted; the shape check is case-insensitive
        assert!(validate("0123456789ABCDEF01234567").is_ok());
    }
}
