use serde::{Deserialize, Serialize};

/// Body of the admin login form. The password is compared verbatim.
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").finish_non_exhaustive()
    }
}
