use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Description stored when a note arrives without one.
pub const DEFAULT_DESCRIPTION: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub user: String,
    pub date: DateTime<Utc>,
}

/// Note payload as received on create and update. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Mutable fields of a stored note. Owner and title form the key and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChanges {
    pub description: String,
    pub date: DateTime<Utc>,
}

impl NoteDraft {
    pub fn defaults(&mut self) {
        self.defaults_at(Utc::now());
    }

    /// Fills `date` with `now` when unset and `description` with "N/A" when empty.
    /// Title and user are left alone. Applying it twice changes nothing.
    pub fn defaults_at(&mut self, now: DateTime<Utc>) {
        if self.date.map_or(true, is_zero_time) {
            self.date = Some(now);
        }
        if self.description.is_empty() {
            self.description = DEFAULT_DESCRIPTION.to_string();
        }
    }

    pub fn into_note(mut self, now: DateTime<Utc>) -> Note {
        self.defaults_at(now);
        Note {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            user: self.user,
            date: self.date.unwrap_or(now),
        }
    }

    pub fn into_changes(mut self, now: DateTime<Utc>) -> NoteChanges {
        self.defaults_at(now);
        NoteChanges {
            description: self.description,
            date: self.date.unwrap_or(now),
        }
    }
}

// Clients built against the legacy service send 0001-01-01T00:00:00Z for "no date"
fn is_zero_time(date: DateTime<Utc>) -> bool {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .map_or(false, |zero| zero == date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(description: &str, date: Option<DateTime<Utc>>) -> NoteDraft {
        NoteDraft {
            title: "Groceries".to_string(),
            description: description.to_string(),
            user: "alice".to_string(),
            date,
        }
    }

    #[test]
    fn unset_date_becomes_now() {
        let before = Utc::now();
        let mut note = draft("Milk", None);
        note.defaults();
        let after = Utc::now();

        let date = note.date.unwrap();
        assert!(date >= before && date <= after);
        assert_eq!(note.description, "Milk");
    }

    #[test]
    fn empty_description_becomes_na() {
        let now = Utc::now();
        let mut note = draft("", Some(now));
        note.defaults_at(now + Duration::hours(1));
        assert_eq!(note.description, DEFAULT_DESCRIPTION);
        assert_eq!(note.date, Some(now));
    }

    #[test]
    fn complete_draft_is_unchanged() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut note = draft("Milk, eggs", Some(date));
        let original = note.clone();
        note.defaults_at(Utc::now());
        assert_eq!(note, original);
        note.defaults_at(Utc::now());
        assert_eq!(note, original);
    }

    #[test]
    fn zero_time_counts_as_unset() {
        let zero: DateTime<Utc> = "0001-01-01T00:00:00Z".parse().unwrap();
        let now = Utc::now();
        let mut note = draft("Milk", Some(zero));
        note.defaults_at(now);
        assert_eq!(note.date, Some(now));
    }

    #[test]
    fn title_and_user_are_never_defaulted() {
        let mut note = NoteDraft::default();
        note.defaults();
        assert_eq!(note.title, "");
        assert_eq!(note.user, "");
    }

    #[test]
    fn draft_parses_partial_json() {
        let draft: NoteDraft = serde_json::from_str(r#"{"title":"Groceries","user":"alice"}"#).unwrap();
        assert_eq!(draft.description, "");
        assert!(draft.date.is_none());

        let note = draft.into_note(Utc::now());
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.user, "alice");
        assert_eq!(note.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn changes_drop_key_fields() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let changes = draft("", Some(date)).into_changes(Utc::now());
        assert_eq!(changes, NoteChanges { description: DEFAULT_DESCRIPTION.to_string(), date });
    }
}
