use serde::Serialize;

use crate::schemas::user::UserResponse;

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) token: String,
    pub(crate) user: UserResponse,
}
