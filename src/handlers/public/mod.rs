// handlers/public/mod.rs - handlers reachable without a token

pub mod auth;
pub mod health;

pub use health::health_get;
