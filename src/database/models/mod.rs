pub mod account;
pub mod note;

pub use account::Account;
pub use note::{Note, NoteChanges, NoteDraft, DEFAULT_DESCRIPTION};
