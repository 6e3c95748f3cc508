//! Record identifiers: 24 lowercase hex characters (creation seconds + random tail).

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

pub const ID_LEN: usize = 24;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Fresh id: 4 bytes of big-endian creation seconds followed by 8 random bytes.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let secs = now.timestamp().clamp(0, u32::MAX as i64) as u32;
        let random = uuid::Uuid::new_v4();
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&random.as_bytes()[8..]);
        TodoId(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Structural check only; says nothing about whether the record exists.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(TodoId(raw.to_ascii_lowercase()))
        } else {
            Err(AppError::InvalidId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_parse_back() {
        let id = TodoId::generate(Utc::now());
        assert_eq!(id.as_str().len(), ID_LEN);
        assert_eq!(TodoId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn generated_ids_lead_with_creation_seconds() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let id = TodoId::generate(now);
        assert!(id.as_str().starts_with("6553f100"));
    }

    #[test]
    fn generated_ids_differ() {
        let now = Utc::now();
        assert_ne!(TodoId::generate(now), TodoId::generate(now));
    }

    #[test]
    fn parse_normalises_case() {
        let id = TodoId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.as_str(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn parse_rejects_malformed() {
        for raw in [
            "",
            "123",
            "65a1b2c3d4e5f60718293a4",
            "65a1b2c3d4e5f60718293a4bc",
            "65a1b2c3d4e5f60718293a4g",
            "not-an-id-not-an-id-1234",
        ] {
            assert!(matches!(TodoId::parse(raw), Err(AppError::InvalidId(_))), "{raw}");
        }
    }
}
