// ================
// common/src/lib.rs
// ================
//! Common types shared between the commerce member API and its clients.
//! Defines the authenticated principal, the credential headers and the
//! request/response bodies of the member endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Member identifier assigned by the durable store
pub type MemberId = i64;

/// Header carrying the login identifier
pub const HEADER_LOGIN_ID: &str = "X-Loopers-LoginId";

/// Header carrying the raw password
pub const HEADER_LOGIN_PW: &str = "X-Loopers-LoginPw";

/// The principal resolved for a single request.
///
/// Produced only by a successful authentication (cache hit or durable
/// verification) and never persisted beyond the request or the credential
/// cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    pub member_id: MemberId,
    pub login_id: String,
}

impl AuthenticatedIdentity {
    pub fn new(member_id: MemberId, login_id: impl Into<String>) -> Self {
        Self {
            member_id,
            login_id: login_id.into(),
        }
    }
}

/// Body of `POST /api/v1/members`
/// # Fields
/// * `login_id` - ASCII letters and digits only
/// * `password` - Raw password, checked against the password policy
/// * `name` - Display name, stored as given and returned masked
/// * `email` - Contact address
/// * `birth_date` - `YYYY-MM-DD`, also used by the password policy
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub login_id: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}

/// Body of `PATCH /api/v1/members/me/password`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Member view returned by the member endpoints
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: MemberId,
    pub login_id: String,
    pub masked_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_uses_camel_case() {
        let json = r#"{
            "loginId": "member01",
            "password": "Password1!",
            "name": "Kim",
            "email": "kim@example.com",
            "birthDate": "2000-01-01"
        }"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.login_id, "member01");
        assert_eq!(
            request.birth_date,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_member_response_serializes_birth_date_as_iso() {
        let response = MemberResponse {
            id: 7,
            login_id: "member01".to_string(),
            masked_name: "Ki*".to_string(),
            email: "kim@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["birthDate"], "1999-12-31");
        assert_eq!(value["maskedName"], "Ki*");
    }
}
