//! Admin authentication: password hashing, session tokens, login.

pub mod jwt;
pub mod password;
pub mod service;

pub use service::{AuthService, LoginResult};
