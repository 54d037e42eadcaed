use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::error::require_non_blank;
use storefront_core::{DomainError, DomainResult, Entity, define_id};

define_id! {
    /// Unique identifier for a customer or staff account.
    pub struct UserId;
}

/// Trim the address and lowercase its domain part.
///
/// The local part keeps its case; uniqueness is still checked
/// case-insensitively (see [`User::email_key`]).
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let trimmed = raw.trim();
    let Some((local, domain)) = trimmed.rsplit_once('@') else {
        return Err(DomainError::validation("email must contain '@'"));
    };
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || local.contains(char::is_whitespace)
    {
        return Err(DomainError::validation(format!("invalid email address '{trimmed}'")));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(DomainError::validation(format!("invalid email domain '{domain}'")));
    }
    Ok(format!("{local}@{}", domain.to_lowercase()))
}

/// Command: RegisterUser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl RegisterUser {
    pub fn customer(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            is_staff: false,
        }
    }
}

/// An account. The email address is the login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn register(cmd: RegisterUser, now: DateTime<Utc>) -> DomainResult<Self> {
        let email = normalize_email(&cmd.email)?;
        require_non_blank("first name", &cmd.first_name)?;
        require_non_blank("last name", &cmd.last_name)?;
        Ok(Self {
            id: UserId::new(),
            email,
            first_name: cmd.first_name.trim().to_string(),
            last_name: cmd.last_name.trim().to_string(),
            is_active: true,
            is_staff: cmd.is_staff,
            date_joined: now,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Key of the case-insensitive email constraint.
    pub fn email_key(&self) -> String {
        self.email.to_lowercase()
    }

    /// Directory ordering: first name, then last name.
    pub fn sort_key(&self) -> (&str, &str) {
        (&self.first_name, &self.last_name)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} <{}>", self.full_name(), self.email)
    }
}

/// Account record store. Emails are unique case-insensitively.
pub trait UserStore: Send + Sync {
    fn register(&self, cmd: RegisterUser) -> DomainResult<User>;
    fn get(&self, id: UserId) -> DomainResult<User>;
    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    /// Users ordered by (first name, last name).
    fn list(&self) -> DomainResult<Vec<User>>;
    fn deactivate(&self, id: UserId) -> DomainResult<User>;
}
