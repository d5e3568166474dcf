//! # Auth Commands
//!
//! Sign-in and sign-up screens. Both wait out the mock auth delay; nothing
//! else in the shell runs meanwhile, as a modal spinner would block the UI.

use serde::Serialize;
use storefront_core::validation::RegistrationForm;
use storefront_core::User;
use storefront_session::Session;
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub signed_in: bool,
    pub user: Option<User>,
}

impl AuthResponse {
    fn from_user(user: Option<User>) -> Self {
        AuthResponse {
            signed_in: user.is_some(),
            user,
        }
    }
}

pub async fn login(session: &Session, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    debug!(email, "login command");
    let user = session.login(email, password).await?;
    Ok(AuthResponse::from_user(Some(user)))
}

pub async fn register(session: &Session, form: &RegistrationForm) -> Result<AuthResponse, ApiError> {
    debug!(email = %form.email, "register command");
    let user = session.register(form).await?;
    Ok(AuthResponse::from_user(Some(user)))
}

pub fn logout(session: &Session) -> AuthResponse {
    session.logout();
    AuthResponse::from_user(None)
}

pub fn whoami(session: &Session) -> AuthResponse {
    AuthResponse::from_user(session.current_user())
}
