use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Res};

/// Role a redemption code (and the account that redeems it) is tied to.
/// Stored as plain `TEXT` in both Postgres stores.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
pub enum AccountType {
    User,
    Creator,
}

impl AccountType {
    /// Returns the account type as its canonical string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::User => "USER",
            AccountType::Creator => "CREATOR",
        }
    }

    /// Creates an account type from a request string.
    pub fn from_str(s: &str) -> Res<Self> {
        match s {
            "USER" => Ok(AccountType::User),
            "CREATOR" => Ok(AccountType::Creator),
            other => Err(AppError::BadRequest(format!(
                "Invalid account type: {} (expected USER or CREATOR)",
                other
            ))),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical form of an email address: trimmed and lowercased.
/// Every lookup and insert goes through this, so `User@X.com` and
/// `user@x.com` are the same account.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_type_parses_canonical_strings() {
        assert_eq!(AccountType::from_str("USER").unwrap(), AccountType::User);
        assert_eq!(
            AccountType::from_str("CREATOR").unwrap(),
            AccountType::Creator
        );
    }

    #[test]
    fn account_type_rejects_unknown_and_lowercase_strings() {
        assert!(matches!(
            AccountType::from_str("ADMIN"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            AccountType::from_str("user"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn account_type_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&AccountType::Creator).unwrap(),
            "\"CREATOR\""
        );
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Reader@Example.COM "), "reader@example.com");
        assert_eq!(normalize_email(""), "");
    }
}
