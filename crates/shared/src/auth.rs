//! Authentication types for the bearer principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by bearer access tokens.
///
/// The subject is the account. An account may not have created its profile
/// yet, so `profile` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Profile ID of the account, once one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Uuid>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(account_id: Uuid, profile_id: Option<Uuid>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            profile: profile_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the profile ID from claims, if the account has one.
    #[must_use]
    pub const fn profile_id(&self) -> Option<Uuid> {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let account_id = Uuid::new_v4();
        let profile_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);
        let before = Utc::now().timestamp();

        let claims = Claims::new(account_id, Some(profile_id), expires_at);

        assert_eq!(claims.account_id(), account_id);
        assert_eq!(claims.profile_id(), Some(profile_id));
        assert!(claims.iat >= before);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_claims_without_profile_omit_field() {
        let claims = Claims::new(Uuid::new_v4(), None, Utc::now() + Duration::hours(1));
        let value = serde_json::to_value(&claims).unwrap();

        assert!(value.get("profile").is_none());

        let parsed: Claims = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.profile_id(), None);
    }
}
