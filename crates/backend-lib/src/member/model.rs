//! Member record and its validated value types.
use crate::validation::{validate_email, validate_login_id, validate_name, ValidationResult};
use chrono::NaiveDate;
use commerce_common::{AuthenticatedIdentity, MemberId, MemberResponse, RegisterRequest};
use serde::{Deserialize, Serialize};

/// Login identifier: ASCII letters and digits only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginId(String);

impl LoginId {
    pub fn parse(value: &str) -> ValidationResult<Self> {
        validate_login_id(value).map(|v| Self(v.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-blank display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberName(String);

impl MemberName {
    pub fn parse(value: &str) -> ValidationResult<Self> {
        validate_name(value).map(|v| Self(v.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Syntactically valid email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn parse(value: &str) -> ValidationResult<Self> {
        validate_email(value).map(|v| Self(v.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored member
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub login_id: String,
    /// scrypt PHC string
    pub password_hash: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub email: String,
}

impl Member {
    pub fn identity(&self) -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(self.id, self.login_id.clone())
    }

    /// The name with its last character replaced by `*`
    pub fn masked_name(&self) -> String {
        let mut chars: Vec<char> = self.name.chars().collect();
        if chars.len() <= 1 {
            return "*".to_string();
        }
        chars.pop();
        chars.push('*');
        chars.into_iter().collect()
    }

    pub fn to_response(&self) -> MemberResponse {
        MemberResponse {
            id: self.id,
            login_id: self.login_id.clone(),
            masked_name: self.masked_name(),
            email: self.email.clone(),
            birth_date: self.birth_date,
        }
    }
}

/// A member about to be inserted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewMember {
    pub login_id: LoginId,
    pub password_hash: String,
    pub name: MemberName,
    pub birth_date: NaiveDate,
    pub email: Email,
}

/// Registration input before validation
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub login_id: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}

impl From<RegisterRequest> for RegisterCommand {
    fn from(request: RegisterRequest) -> Self {
        Self {
            login_id: request.login_id,
            password: request.password,
            name: request.name,
            email: request.email,
            birth_date: request.birth_date,
        }
    }
}
