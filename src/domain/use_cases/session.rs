use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use validator::Validate;

use crate::{
    domain::catalog::{self, DEMO_PASSWORD},
    entities::user::{LoginUser, User},
    repositories::session::SessionRepository,
};

/// Mock authentication against the built-in directory. Holds the one active
/// identity and mirrors it into the `currentUser` record.
pub struct SessionHandler<R>
where
    R: SessionRepository,
{
    pub session_repo: R,
    login_delay: Duration,
    current: RwLock<Option<User>>,
}

impl<R> SessionHandler<R>
where
    R: SessionRepository,
{
    pub fn new(session_repo: R, login_delay: Duration) -> Self {
        SessionHandler {
            session_repo,
            login_delay,
            current: RwLock::new(None),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }

    /// Reloads the persisted identity. A record that cannot be read is dropped.
    pub async fn restore(&self) -> Option<User> {
        match self.session_repo.load_current_user().await {
            Ok(user) => {
                *self.current.write() = user.clone();
                if let Some(user) = &user {
                    tracing::info!(user_id = %user.id, "Restored saved session");
                }
                user
            }
            Err(e) => {
                tracing::error!("Error parsing saved user: {}", e);
                if let Err(e) = self.session_repo.clear_current_user().await {
                    tracing::warn!("Failed to remove saved user: {}", e);
                }
                None
            }
        }
    }

    /// Signs in a directory user. Unknown emails and wrong passwords yield `None`.
    pub async fn login(&self, request: LoginUser) -> Option<User> {
        tokio::time::sleep(self.login_delay).await;

        if request.validate().is_err() {
            tracing::debug!("Rejected malformed login request");
            return None;
        }

        let found = catalog::find_user_by_email(&request.email)?;
        if request.password != DEMO_PASSWORD {
            tracing::warn!(user_id = %found.id, "Login failed: wrong password");
            return None;
        }

        let user = User {
            last_login: Some(Utc::now()),
            ..found.clone()
        };

        if let Err(e) = self.session_repo.save_current_user(&user).await {
            tracing::error!(user_id = %user.id, "Failed to persist session: {}", e);
        }
        *self.current.write() = Some(user.clone());

        tracing::info!(user_id = %user.id, role = ?user.role, "User logged in successfully");
        Some(user)
    }

    pub async fn logout(&self) {
        let previous = self.current.write().take();
        if let Err(e) = self.session_repo.clear_current_user().await {
            tracing::warn!("Failed to remove saved user: {}", e);
        }
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "User logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::AppError, repositories::session::MockSessionRepository};

    fn login(email: &str, password: &str) -> LoginUser {
        LoginUser {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_with_demo_password_persists_the_user() {
        let mut repo = MockSessionRepository::new();
        repo.expect_save_current_user()
            .times(1)
            .returning(|user| {
                assert_eq!(user.id, "1");
                Ok(())
            });
        let handler = SessionHandler::new(repo, Duration::ZERO);

        let user = handler.login(login("john.doe@company.com", "password123")).await.unwrap();

        assert!(user.last_login.is_some());
        assert_eq!(handler.current_user().map(|u| u.id), Some("1".to_string()));
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_email_is_rejected() {
        let mut repo = MockSessionRepository::new();
        repo.expect_save_current_user().never();
        let handler = SessionHandler::new(repo, Duration::ZERO);

        assert!(handler.login(login("john.doe@company.com", "hunter2")).await.is_none());
        assert!(handler.login(login("ghost@company.com", "password123")).await.is_none());
        assert!(handler.login(login("not-an-email", "password123")).await.is_none());
        assert!(handler.current_user().is_none());
    }

    #[tokio::test]
    async fn malformed_saved_user_is_removed() {
        let mut repo = MockSessionRepository::new();
        repo.expect_load_current_user()
            .returning(|| Err(AppError::StorageError("Malformed record".into())));
        repo.expect_clear_current_user().times(1).returning(|| Ok(()));
        let handler = SessionHandler::new(repo, Duration::ZERO);

        assert!(handler.restore().await.is_none());
        assert!(handler.current_user().is_none());
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let mut repo = MockSessionRepository::new();
        repo.expect_save_current_user().returning(|_| Ok(()));
        repo.expect_clear_current_user().times(1).returning(|| Ok(()));
        let handler = SessionHandler::new(repo, Duration::ZERO);

        handler.login(login("manager@company.com", "password123")).await.unwrap();
        handler.logout().await;

        assert!(handler.current_user().is_none());
    }
}
