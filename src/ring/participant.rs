//! Participant identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::RingError;

/// Case-normalized participant key, unique per player across all games.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Normalizes `raw` (trimmed, lower-cased). Empty keys are rejected.
    pub fn new(raw: &str) -> Result<Self, RingError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(RingError::InvalidArgument(
                "participant id must not be empty".to_string(),
            ));
        }
        Ok(ParticipantId(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = RingError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        ParticipantId::new(&raw)
    }
}

impl From<ParticipantId> for String {
    fn from(id: ParticipantId) -> Self {
        id.0
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_trimmed_and_lowercased() {
        let id = ParticipantId::new("  PMaloney ").unwrap();
        assert_eq!(id.as_str(), "pmaloney");
        assert_eq!(id, ParticipantId::new("pmaloney").unwrap());
    }

    #[test]
    fn blank_id_is_rejected() {
        assert!(matches!(
            ParticipantId::new("   "),
            Err(RingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ParticipantId::new("alice").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"alice\"");
    }

    #[test]
    fn deserializing_normalizes() {
        let id: ParticipantId = serde_json::from_str("\"Bob\"").unwrap();
        assert_eq!(id.as_str(), "bob");
        assert!(serde_json::from_str::<ParticipantId>("\"\"").is_err());
    }
}
