// handlers/mod.rs - two security tiers
//
// Public (no token): sign-up, sign-in, health
// Protected (bearer token + ownership gate): notes CRUD, account delete

pub mod protected;
pub mod public;
