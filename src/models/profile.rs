use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// Stored roles are compared trimmed and case-insensitively; anything
    /// unrecognised is treated as a student.
    pub fn from_db(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "instructor" => Role::Instructor,
            _ => Role::Student,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    /// Where a freshly signed-in user should land.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            _ => "/portal/dashboard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub status: String,
    pub join_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Profile {
    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub status: String,
    pub join_date: Option<String>,
    pub notes: Option<String>,
}

impl NewProfile {
    pub fn basic(id: &str, email: &str, full_name: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            role,
            phone: None,
            age: None,
            parent_email: None,
            parent_phone: None,
            status: "active".to_string(),
            join_date: None,
            notes: None,
        }
    }
}
