//! User store models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidRole(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRole(s) => write!(f, "Invalid role: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Named permission group held by a user
///
/// The string forms are the wire/storage values; they are fixed and must
/// stay in sync with the role names embedded in issued session tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Sysadmin,
    Administrador,
    AdminReporte,
    Organizer,
    Attendee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Sysadmin => "sysadmin",
            Role::Administrador => "administrador",
            Role::AdminReporte => "admin-reporte",
            Role::Organizer => "organizer",
            Role::Attendee => "attendee",
        }
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sysadmin" => Ok(Role::Sysadmin),
            "administrador" => Ok(Role::Administrador),
            "admin-reporte" => Ok(Role::AdminReporte),
            "organizer" => Ok(Role::Organizer),
            "attendee" => Ok(Role::Attendee),
            _ => Err(ParseError::InvalidRole(s.to_string())),
        }
    }
}

/// User record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            full_name: row.try_get("full_name")?,
            // Unknown role strings fall back to the least-privileged role
            role: Role::from_str(&role_str).unwrap_or(Role::Attendee),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_string_round_trip() {
        for role in [
            Role::Sysadmin,
            Role::Administrador,
            Role::AdminReporte,
            Role::Organizer,
            Role::Attendee,
        ] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Role::from_str("superuser").is_err());
        assert!(Role::from_str("").is_err());
        // Parsing is exact, not case-insensitive
        assert!(Role::from_str("Sysadmin").is_err());
    }

    #[test]
    fn test_role_serde_forms() {
        assert_eq!(
            serde_json::to_string(&Role::AdminReporte).unwrap(),
            "\"admin-reporte\""
        );
        let parsed: Role = serde_json::from_str("\"administrador\"").unwrap();
        assert_eq!(parsed, Role::Administrador);
    }
}
