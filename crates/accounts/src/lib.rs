//! Customer accounts: user records, email identity and password policy.
//!
//! Authentication flows and sessions are handled elsewhere; this crate only
//! decides what a valid account looks like.

pub mod password;
pub mod user;

pub use password::{PasswordPolicy, PasswordRule, PasswordViolation};
pub use user::{RegisterUser, User, UserId, UserStore, normalize_email};
