// handlers/protected/notes/mod.rs - note CRUD, one owner at a time

pub mod create;
pub mod delete;
pub mod read;
pub mod update;

pub use create::note_create;
pub use delete::note_delete;
pub use read::{note_get, notes_list, notes_prefix};
pub use update::note_update;
