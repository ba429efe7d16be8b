//! Account registration and login
//!
//! Credentials live in the user store as Argon2 hashes; successful
//! registration and login both issue an HS256 JWT. Downstream services
//! only ever see the verified user id carried in the claims.

use std::sync::Arc;

use tracing::info;

use crate::auth::{hash_password, verify_password, JwtValidator, TokenInput};
use crate::store::{Stores, User, UserStore};
use crate::types::{CatalogError, Result};

/// An authenticated account plus its freshly issued token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

pub struct AccountService {
    users: Arc<dyn UserStore>,
    jwt: JwtValidator,
}

impl AccountService {
    pub fn new(stores: &Stores, jwt: JwtValidator) -> Self {
        Self {
            users: stores.users.clone(),
            jwt,
        }
    }

    /// Create an account and issue a token.
    ///
    /// Fails with `Conflict` when the email is already registered.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        if self.users.find_by_identifier(email).await?.is_some() {
            return Err(CatalogError::Conflict(
                "The email address is already in use by another account.".into(),
            ));
        }

        let password_hash = hash_password(password)?;
        let user = self.users.create(email, name, &password_hash).await?;
        info!(identifier = %user.identifier, "user registered");

        self.issue(user)
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let user = self
            .users
            .find_by_identifier(email)
            .await?
            .ok_or_else(|| CatalogError::Unauthorized("Invalid login credentials".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(CatalogError::Unauthorized("Invalid login credentials".into()));
        }

        self.issue(user)
    }

    /// Look up the account behind a verified user id.
    pub async fn profile(&self, user_id: &str) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("User not found".into()))
    }

    fn issue(&self, user: User) -> Result<Session> {
        let (token, expires_at) = self.jwt.generate_token(TokenInput {
            user_id: user.id.clone(),
            identifier: user.identifier.clone(),
            name: user.name.clone(),
        })?;

        Ok(Session {
            user,
            token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Stores;

    fn service(stores: &Stores) -> AccountService {
        AccountService::new(stores, JwtValidator::new_dev())
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let stores = Stores::memory();
        let accounts = service(&stores);

        let session = accounts
            .register("user@example.com", "strongpassword", "Jane Doe")
            .await
            .unwrap();
        assert!(!session.token.is_empty());
        assert_eq!(session.user.identifier, "user@example.com");

        let login = accounts
            .login("user@example.com", "strongpassword")
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let stores = Stores::memory();
        let accounts = service(&stores);

        accounts
            .register("user@example.com", "strongpassword", "Jane Doe")
            .await
            .unwrap();

        let err = accounts
            .register("user@example.com", "other-password", "Someone Else")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let stores = Stores::memory();
        let accounts = service(&stores);

        accounts
            .register("user@example.com", "strongpassword", "Jane Doe")
            .await
            .unwrap();

        let err = accounts
            .login("user@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized(_)));

        let err = accounts
            .login("missing@example.com", "strongpassword")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn profile_resolves_registered_user() {
        let stores = Stores::memory();
        let accounts = service(&stores);

        let session = accounts
            .register("user@example.com", "strongpassword", "Jane Doe")
            .await
            .unwrap();

        let user = accounts.profile(&session.user.id).await.unwrap();
        assert_eq!(user.name, "Jane Doe");
    }
}
