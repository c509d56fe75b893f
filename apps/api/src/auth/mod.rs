//! Account credentials and request authentication.
//!
//! Passwords are stored as Argon2id PHC strings. Access tokens are HS256 JWTs
//! carrying the user id and staff flag; the extractors in [`extract`] turn a
//! valid token into an [`extract::AuthUser`] or [`extract::StaffUser`].

pub mod extract;
pub mod jwt;
pub mod password;

pub use extract::{AuthUser, StaffUser};
