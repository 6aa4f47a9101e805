// ============================
// crates/backend-lib/src/auth/policy.rs
// ============================
//! Password policy applied on every password write.
//!
//! A candidate password must be 8 to 16 characters long, satisfy the
//! configured character rule, and must not contain the member's birth date in
//! any of its `YYYYMMDD`, `YYMMDD` or `MMDD` forms.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 16;

/// Symbols accepted by [`CharacterRule::AllowedSymbolsOnly`]
pub const ALLOWED_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Character classes a password is checked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharacterClass::Uppercase => "uppercase letter",
            CharacterClass::Lowercase => "lowercase letter",
            CharacterClass::Digit => "digit",
            CharacterClass::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

/// Reasons a password is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password must contain at least one {0}")]
    MissingCharacterClass(CharacterClass),

    #[error("Password contains a character that is not allowed: {0:?}")]
    InvalidCharacter(char),

    #[error("Password must not contain the birth date")]
    ContainsBirthday,
}

/// How the characters of a password are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterRule {
    /// At least one uppercase letter, lowercase letter, digit and
    /// non-alphanumeric symbol each. No character is rejected outright.
    #[default]
    RequireAllClasses,
    /// Every character must be an ASCII letter, digit or one of
    /// [`ALLOWED_SYMBOLS`]; no class is required.
    AllowedSymbolsOnly,
}

/// Stateless password policy
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicy {
    pub character_rule: CharacterRule,
}

impl PasswordPolicy {
    pub const fn new(character_rule: CharacterRule) -> Self {
        Self { character_rule }
    }

    /// Validate `password` for a member born on `birth_date`.
    ///
    /// Rules are checked in order (length, characters, birth date) and the
    /// first violation is returned.
    pub fn validate(&self, password: &str, birth_date: NaiveDate) -> Result<(), PolicyViolation> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PolicyViolation::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(PolicyViolation::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            });
        }

        match self.character_rule {
            CharacterRule::RequireAllClasses => check_classes(password)?,
            CharacterRule::AllowedSymbolsOnly => check_allowed(password)?,
        }

        if birthday_patterns(birth_date)
            .iter()
            .any(|pattern| password.contains(pattern.as_str()))
        {
            return Err(PolicyViolation::ContainsBirthday);
        }

        Ok(())
    }
}

/// Validate with the default policy
pub fn validate_password(password: &str, birth_date: NaiveDate) -> Result<(), PolicyViolation> {
    PasswordPolicy::default().validate(password, birth_date)
}

/// `YYYYMMDD`, `YYMMDD` and `MMDD`, zero padded
pub fn birthday_patterns(birth_date: NaiveDate) -> [String; 3] {
    [
        birth_date.format("%Y%m%d").to_string(),
        birth_date.format("%y%m%d").to_string(),
        birth_date.format("%m%d").to_string(),
    ]
}

fn check_classes(password: &str) -> Result<(), PolicyViolation> {
    let required = [
        (CharacterClass::Uppercase, password.chars().any(char::is_uppercase)),
        (CharacterClass::Lowercase, password.chars().any(char::is_lowercase)),
        (CharacterClass::Digit, password.chars().any(|c| c.is_ascii_digit())),
        (CharacterClass::Symbol, password.chars().any(|c| !c.is_alphanumeric())),
    ];
    match required.iter().find(|(_, present)| !present) {
        Some((class, _)) => Err(PolicyViolation::MissingCharacterClass(*class)),
        None => Ok(()),
    }
}

fn check_allowed(password: &str) -> Result<(), PolicyViolation> {
    match password
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || ALLOWED_SYMBOLS.contains(*c)))
    {
        Some(c) => Err(PolicyViolation::InvalidCharacter(c)),
        None => Ok(()),
    }
}
