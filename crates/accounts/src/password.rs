//! Password strength policy.
//!
//! Every rule is evaluated; callers get the complete list of failures so a
//! form can show them all at once.

use thiserror::Error;

use crate::user::User;

/// Minimum accepted length, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Share of the password a user attribute may cover before it counts as "too similar".
const MAX_SIMILARITY: f64 = 0.7;

/// Frequently leaked passwords, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "000000", "111111", "1234", "12345", "123456", "1234567", "12345678", "123456789",
    "1234567890", "654321", "abc123", "admin", "baseball", "changeme", "computer", "dragon",
    "football", "freedom", "iloveyou", "letmein", "master", "michael", "monkey", "passw0rd",
    "password", "password1", "princess", "qwerty", "qwerty123", "shadow", "starwars",
    "sunshine", "superman", "trustno1", "welcome", "whatever",
];

/// A password rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinimumLength(usize),
    NotCommon,
    NotEntirelyNumeric,
    ContainsUppercase,
    ContainsLowercase,
    NotSimilarToUser,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordViolation {
    #[error("this password is too short; it must contain at least {0} characters")]
    TooShort(usize),
    #[error("this password is too common")]
    TooCommon,
    #[error("this password is entirely numeric")]
    EntirelyNumeric,
    #[error("this password does not contain an uppercase letter")]
    NoUppercase,
    #[error("this password does not contain a lowercase letter")]
    NoLowercase,
    #[error("the password is too similar to the {0}")]
    TooSimilar(&'static str),
}

/// Ordered set of password rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    rules: Vec<PasswordRule>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                PasswordRule::NotSimilarToUser,
                PasswordRule::MinimumLength(DEFAULT_MIN_LENGTH),
                PasswordRule::NotCommon,
                PasswordRule::NotEntirelyNumeric,
                PasswordRule::ContainsUppercase,
                PasswordRule::ContainsLowercase,
            ],
        }
    }
}

impl PasswordPolicy {
    pub fn new(rules: Vec<PasswordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PasswordRule] {
        &self.rules
    }

    /// Check `password`; `user` enables the similarity rule.
    pub fn validate(
        &self,
        password: &str,
        user: Option<&User>,
    ) -> Result<(), Vec<PasswordViolation>> {
        let violations: Vec<PasswordViolation> = self
            .rules
            .iter()
            .filter_map(|rule| check_rule(*rule, password, user))
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check_rule(
    rule: PasswordRule,
    password: &str,
    user: Option<&User>,
) -> Option<PasswordViolation> {
    match rule {
        PasswordRule::MinimumLength(min) => {
            (password.chars().count() < min).then_some(PasswordViolation::TooShort(min))
        }
        PasswordRule::NotCommon => {
            let candidate = password.trim().to_lowercase();
            COMMON_PASSWORDS
                .contains(&candidate.as_str())
                .then_some(PasswordViolation::TooCommon)
        }
        PasswordRule::NotEntirelyNumeric => (!password.is_empty()
            && password.chars().all(|c| c.is_ascii_digit()))
        .then_some(PasswordViolation::EntirelyNumeric),
        PasswordRule::ContainsUppercase => {
            (!password.chars().any(char::is_uppercase)).then_some(PasswordViolation::NoUppercase)
        }
        PasswordRule::ContainsLowercase => {
            (!password.chars().any(char::is_lowercase)).then_some(PasswordViolation::NoLowercase)
        }
        PasswordRule::NotSimilarToUser => user.and_then(|u| similar_attribute(password, u)),
    }
}

fn similar_attribute(password: &str, user: &User) -> Option<PasswordViolation> {
    let password = password.to_lowercase();
    let local_part = user.email.split('@').next().unwrap_or_default().to_lowercase();
    let candidates = [
        ("email address", local_part),
        ("first name", user.first_name.to_lowercase()),
        ("last name", user.last_name.to_lowercase()),
    ];
    candidates
        .into_iter()
        .find(|(_, value)| value.chars().count() >= 3 && too_similar(&password, value))
        .map(|(label, _)| PasswordViolation::TooSimilar(label))
}

/// Similar when the attribute covers most of the password (as a substring) or vice versa.
fn too_similar(password: &str, attribute: &str) -> bool {
    let (shorter, longer) = if password.len() <= attribute.len() {
        (password, attribute)
    } else {
        (attribute, password)
    };
    if shorter.is_empty() || !longer.contains(shorter) {
        return false;
    }
    shorter.chars().count() as f64 / longer.chars().count() as f64 >= MAX_SIMILARITY
}
