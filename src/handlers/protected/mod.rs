// handlers/protected/mod.rs - bearer token required
//
// Every handler here receives the verified caller as `Extension<AuthUser>` and must pass the
// ownership gate before touching a store.

pub mod account;
pub mod notes;

pub use account::account_delete;
