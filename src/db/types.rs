use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Access tier of a user: teachers create and grade papers, students
/// consume and answer them. Closed set, no free-form roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Teacher,
    Student,
}

impl UserRole {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "teacher" => Some(UserRole::Teacher),
            "student" => Some(UserRole::Student),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_roles() {
        assert_eq!(UserRole::parse("teacher"), Some(UserRole::Teacher));
        assert_eq!(UserRole::parse("student"), Some(UserRole::Student));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse(""), None);
    }
}
