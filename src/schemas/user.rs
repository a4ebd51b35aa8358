use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) name: String,
    pub(crate) role: UserRole,
    pub(crate) profile_pic_url: Option<String>,
    pub(crate) roll_no: Option<String>,
    pub(crate) class_name: Option<String>,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.full_name,
            role: user.role,
            profile_pic_url: user.profile_pic_url,
            roll_no: user.roll_no,
            class_name: user.class_name,
            created_at: format_primitive(user.created_at),
        }
    }
}
