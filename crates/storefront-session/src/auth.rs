//! # Mock Auth Service
//!
//! Sign-in and sign-up without a backend: input is validated, a fixed
//! delay stands in for the network round trip, and valid input always
//! succeeds. Dropping the returned future (or wrapping it in
//! `tokio::time::timeout`) abandons the request.

use std::time::Duration;

use storefront_core::validation::{validate_credentials, validate_registration, RegistrationForm};
use storefront_core::{CoreError, User};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::error::SessionResult;

/// The account every successful sign-in resolves to.
pub fn demo_user() -> User {
    User {
        id: "1".to_string(),
        name: "John Doe".to_string(),
        email: "john.doe@example.com".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct MockAuthService {
    delay: Duration,
}

impl MockAuthService {
    pub fn new(delay: Duration) -> Self {
        MockAuthService { delay }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Signs in. Any non-empty email and password work.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<User> {
        validate_credentials(email, password).map_err(CoreError::from)?;

        debug!(delay_ms = self.delay.as_millis() as u64, "Simulating sign-in");
        tokio::time::sleep(self.delay).await;

        let user = demo_user();
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Creates an account from the sign-up form.
    pub async fn register(&self, form: &RegistrationForm) -> SessionResult<User> {
        validate_registration(form).map_err(CoreError::from)?;

        debug!(delay_ms = self.delay.as_millis() as u64, "Simulating sign-up");
        tokio::time::sleep(self.delay).await;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
        };
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }
}

impl Default for MockAuthService {
    fn default() -> Self {
        Self::from_settings(&AuthSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use storefront_core::ValidationError;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
            accepted_terms: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_delay() {
        let auth = MockAuthService::default();
        let started = tokio::time::Instant::now();

        let user = auth.login("someone@example.com", "pw").await.unwrap();

        assert_eq!(user, demo_user());
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_login_fails_immediately() {
        let auth = MockAuthService::default();
        let started = tokio::time::Instant::now();

        let err = auth.login("john@example.com", "").await.unwrap_err();

        assert_eq!(
            err.as_core(),
            Some(&CoreError::Validation(ValidationError::Required {
                field: "password".to_string()
            }))
        );
        assert!(started.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_accepts_any_filled_in_email() {
        let auth = MockAuthService::default();

        for email in ["john@localhost", "john"] {
            let user = auth.login(email, "pw").await.unwrap();
            assert_eq!(user, demo_user());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_uses_form_details() {
        let auth = MockAuthService::new(Duration::from_millis(10));
        let user = auth.register(&form()).await.unwrap();

        assert_eq!(user.name, "Jane Roe");
        assert_eq!(user.email, "jane@example.com");
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_rejects_mismatched_passwords() {
        let auth = MockAuthService::new(Duration::ZERO);
        let mut bad = form();
        bad.confirm_password = "hunter23".to_string();

        let err = auth.register(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Core(CoreError::Validation(ValidationError::Mismatch { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_abandons_login() {
        let auth = MockAuthService::default();
        let result = tokio::time::timeout(
            Duration::from_millis(100),
            auth.login("someone@example.com", "pw"),
        )
        .await;
        assert!(result.is_err());
    }
}
