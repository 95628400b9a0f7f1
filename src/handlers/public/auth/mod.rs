// handlers/public/auth/mod.rs - token acquisition

pub mod signin;
pub mod signup;
pub mod utils;

pub use signin::signin_post;
pub use signup::signup_post;
