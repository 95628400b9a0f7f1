use serde_json::json;

use crate::auth::Owner;
use crate::database::models::Note;
use crate::filter::FilterData;

/// Natural key of a note: (owner, title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteKey {
    user: String,
    title: String,
}

impl NoteKey {
    pub fn new(owner: Owner<'_>, title: &str) -> Self {
        Self {
            user: owner.user().to_string(),
            title: title.to_string(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn to_filter(&self) -> FilterData {
        FilterData::matching(json!({ "title": self.title, "user": self.user }))
    }

    pub fn matches(&self, note: &Note) -> bool {
        note.user == self.user && note.title == self.title
    }
}

/// Read queries over one owner's notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteQuery {
    /// title = T AND user = U
    Exact(NoteKey),
    /// title starts with P (case-sensitive) AND user = U
    Prefix { user: String, prefix: String },
    /// user = U
    Owner { user: String },
}

impl NoteQuery {
    pub fn exact(owner: Owner<'_>, title: &str) -> Self {
        NoteQuery::Exact(NoteKey::new(owner, title))
    }

    pub fn prefix(owner: Owner<'_>, prefix: &str) -> Self {
        NoteQuery::Prefix {
            user: owner.user().to_string(),
            prefix: prefix.to_string(),
        }
    }

    pub fn all(owner: Owner<'_>) -> Self {
        NoteQuery::Owner { user: owner.user().to_string() }
    }

    pub fn user(&self) -> &str {
        match self {
            NoteQuery::Exact(key) => key.user(),
            NoteQuery::Prefix { user, .. } | NoteQuery::Owner { user } => user,
        }
    }

    pub fn to_filter(&self) -> FilterData {
        match self {
            NoteQuery::Exact(key) => key.to_filter(),
            NoteQuery::Prefix { user, prefix } => {
                FilterData::matching(json!({ "title": { "$prefix": prefix }, "user": user }))
            }
            NoteQuery::Owner { user } => FilterData::matching(json!({ "user": user })),
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        match self {
            NoteQuery::Exact(key) => key.matches(note),
            NoteQuery::Prefix { user, prefix } => note.user == *user && note.title.starts_with(prefix.as_str()),
            NoteQuery::Owner { user } => note.user == *user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::authorize;
    use crate::filter::Filter;
    use crate::middleware::AuthUser;
    use chrono::Utc;
    use uuid::Uuid;

    fn alice() -> AuthUser {
        AuthUser { username: "alice".to_string() }
    }

    fn note(user: &str, title: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "N/A".to_string(),
            user: user.to_string(),
            date: Utc::now(),
        }
    }

    fn sql(query: &NoteQuery) -> String {
        let mut filter = Filter::new("notes").unwrap();
        filter.assign(query.to_filter()).unwrap();
        filter.to_sql().unwrap().query
    }

    #[test]
    fn prefix_matches_only_leading_text() {
        let caller = alice();
        let owner = authorize(&caller, "alice").unwrap();
        let query = NoteQuery::prefix(owner, "Gro");

        assert!(query.matches(&note("alice", "Groceries")));
        assert!(query.matches(&note("alice", "Grocery2")));
        assert!(!query.matches(&note("alice", "Work")));
        assert!(!query.matches(&note("alice", "My Groceries")));
        assert!(!query.matches(&note("alice", "groceries")));
        assert!(!query.matches(&note("bob", "Groceries")));
    }

    #[test]
    fn exact_and_owner_queries() {
        let caller = alice();
        let owner = authorize(&caller, "alice").unwrap();

        let exact = NoteQuery::exact(owner, "Groceries");
        assert!(exact.matches(&note("alice", "Groceries")));
        assert!(!exact.matches(&note("alice", "Groceries2")));

        let all = NoteQuery::all(owner);
        assert!(all.matches(&note("alice", "anything")));
        assert!(!all.matches(&note("bob", "anything")));
        assert_eq!(all.user(), "alice");
    }

    #[test]
    fn queries_render_owner_scoped_sql() {
        let caller = alice();
        let owner = authorize(&caller, "alice").unwrap();

        assert_eq!(
            sql(&NoteQuery::exact(owner, "Groceries")),
            "SELECT * FROM \"notes\" WHERE \"title\" = $1 AND \"user\" = $2"
        );
        assert_eq!(
            sql(&NoteQuery::prefix(owner, "Gro")),
            "SELECT * FROM \"notes\" WHERE \"title\" LIKE $1 AND \"user\" = $2"
        );
        assert_eq!(sql(&NoteQuery::all(owner)), "SELECT * FROM \"notes\" WHERE \"user\" = $1");
    }

    #[test]
    fn empty_prefix_matches_every_owned_note() {
        let caller = alice();
        let owner = authorize(&caller, "alice").unwrap();
        let query = NoteQuery::prefix(owner, "");
        assert!(query.matches(&note("alice", "")));
        assert!(query.matches(&note("alice", "Work")));
    }
}
