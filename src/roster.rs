//! Bulk roster parsing.
//!
//! A roster is JSON Lines: one object per row with optional string fields
//! `id`, `name`, `nickname` and `email`. Rows without an id or a name are
//! skipped.

use std::io::BufRead;

use serde::Deserialize;

use crate::profile::Participant;
use crate::ring::ParticipantId;

/// Errors while reading a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RosterRow {
    id: Option<String>,
    name: Option<String>,
    nickname: Option<String>,
    email: Option<String>,
}

/// Result of parsing a roster.
#[derive(Debug, Default)]
pub struct Roster {
    pub participants: Vec<Participant>,
    /// Rows dropped for a missing id or name.
    pub skipped: usize,
}

fn non_blank(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a JSON Lines roster. Blank lines are ignored.
pub fn parse_roster<R: BufRead>(reader: R) -> Result<Roster, RosterError> {
    let mut roster = Roster::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: RosterRow = serde_json::from_str(&line)
            .map_err(|source| RosterError::Malformed { line: idx + 1, source })?;

        let (Some(raw_id), Some(name)) = (non_blank(row.id.as_deref()), non_blank(row.name.as_deref()))
        else {
            roster.skipped += 1;
            continue;
        };
        let Ok(id) = ParticipantId::new(raw_id) else {
            roster.skipped += 1;
            continue;
        };

        roster.participants.push(Participant::new(
            id,
            name,
            row.nickname.as_deref(),
            row.email.as_deref().unwrap_or_default(),
        ));
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_rows_and_skips_incomplete() {
        let input = r#"{"id": "AB12", "name": "Alice Brown", "nickname": "Ace", "email": "ab@x.edu"}

{"id": "cd34", "name": "Carl Dune"}
{"name": "No Id"}
{"id": "ef56", "name": "   "}
{"id": "gh78", "name": "Gina", "nickname": "none", "extra": 1}
"#;
        let roster = parse_roster(input.as_bytes()).unwrap();
        assert_eq!(roster.skipped, 2);
        let ids: Vec<&str> = roster.participants.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["ab12", "cd34", "gh78"]);
        assert_eq!(roster.participants[0].full_display_name, "Alice 'Ace' Brown");
        assert_eq!(roster.participants[1].email, "");
        assert_eq!(roster.participants[2].nickname, None);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let input = "{\"id\": \"a\", \"name\": \"A\"}\nnot json\n";
        match parse_roster(input.as_bytes()) {
            Err(RosterError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }
}
