//! Participant profiles.
//!
//! Identity fields used by notification templates and the public roster
//! view, including the derived "full display name".

use serde::{Deserialize, Serialize};

use crate::ring::ParticipantId;

/// Nickname values that mean "no nickname".
const PLACEHOLDER_NICKNAMES: [&str; 5] = ["none", "n/a", "na", "-", "null"];

/// Persisted profile of a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: String,
    pub full_display_name: String,
}

impl Participant {
    /// Creates a profile, dropping placeholder nicknames and deriving the
    /// full display name.
    pub fn new(id: ParticipantId, name: &str, nickname: Option<&str>, email: &str) -> Self {
        let name = name.trim().to_string();
        let nickname = nickname
            .map(str::trim)
            .filter(|n| !is_placeholder(n))
            .map(str::to_string);
        let full_display_name = full_display_name(&name, nickname.as_deref());
        Participant {
            id,
            name,
            nickname,
            email: email.trim().to_string(),
            full_display_name,
        }
    }
}

fn is_placeholder(nickname: &str) -> bool {
    let n = nickname.trim();
    n.is_empty() || PLACEHOLDER_NICKNAMES.iter().any(|p| n.eq_ignore_ascii_case(p))
}

/// Inserts a quoted nickname after the first word of `name`:
/// `"Pierce Maloney"` + `"Killa"` gives `"Pierce 'Killa' Maloney"`.
///
/// Without a usable nickname the name is returned unchanged.
pub fn full_display_name(name: &str, nickname: Option<&str>) -> String {
    let Some(nick) = nickname.filter(|n| !is_placeholder(n)) else {
        return name.to_string();
    };
    let mut words = name.split_whitespace();
    match words.next() {
        Some(first) => {
            let rest: Vec<&str> = words.collect();
            if rest.is_empty() {
                format!("{first} '{}'", nick.trim())
            } else {
                format!("{first} '{}' {}", nick.trim(), rest.join(" "))
            }
        }
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_goes_after_first_word() {
        assert_eq!(
            full_display_name("Pierce Maloney", Some("killa")),
            "Pierce 'killa' Maloney"
        );
        assert_eq!(
            full_display_name("Mary Ann Smith", Some("Ace")),
            "Mary 'Ace' Ann Smith"
        );
    }

    #[test]
    fn single_word_name() {
        assert_eq!(full_display_name("Cher", Some("Diva")), "Cher 'Diva'");
    }

    #[test]
    fn placeholder_nickname_keeps_name() {
        for nick in ["", "  ", "None", "N/A", "-", "null"] {
            assert_eq!(full_display_name("Pierce Maloney", Some(nick)), "Pierce Maloney");
        }
        assert_eq!(full_display_name("Pierce Maloney", None), "Pierce Maloney");
    }

    #[test]
    fn new_profile_drops_placeholder() {
        let p = Participant::new(
            ParticipantId::new("PM12").unwrap(),
            " Pierce Maloney ",
            Some("none"),
            "pm@example.edu",
        );
        assert_eq!(p.id.as_str(), "pm12");
        assert_eq!(p.nickname, None);
        assert_eq!(p.full_display_name, "Pierce Maloney");
    }

    #[test]
    fn persisted_shape() {
        let p = Participant::new(
            ParticipantId::new("pm12").unwrap(),
            "Pierce Maloney",
            Some("Killa"),
            "pm@example.edu",
        );
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["fullDisplayName"], "Pierce 'Killa' Maloney");
        assert_eq!(json["nickname"], "Killa");
        assert_eq!(json["email"], "pm@example.edu");
    }
}
