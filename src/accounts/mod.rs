//! Accounts
//!
//! Sign-up and login on top of [`UsersDao`]. Passwords are stored as
//! Argon2id PHC strings; plaintext never reaches a container.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use storekit::accounts::{AccountService, LogNotifier, NewUser, RegisterOutcome};
//! use storekit::dao::Daos;
//!
//! let daos = Daos::in_memory().await?;
//! let accounts = AccountService::new(daos.users, Arc::new(LogNotifier::new()));
//!
//! let outcome = accounts
//!     .register(NewUser {
//!         email: "ana@example.com".to_string(),
//!         password: "hunter22".to_string(),
//!         name: "Ana".to_string(),
//!         telephone: 1155550000.0,
//!         adress: "Calle 1".to_string(),
//!         age: 30.0,
//!     })
//!     .await?;
//! assert!(matches!(outcome, RegisterOutcome::Registered(_)));
//!
//! let user = accounts.authenticate("ana@example.com", "hunter22").await?;
//! assert!(user.is_some());
//! # Ok(())
//! # }
//! ```

mod error;
mod notifier;
mod password;

pub use error::{AccountError, AccountResult};
pub use notifier::{LogNotifier, SignupNotifier};
pub use password::{hash_password, verify_password};

use std::sync::Arc;

use crate::dao::{User, UsersDao};
use crate::persistence::RecordId;

/// Sign-up form, password in plaintext
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub telephone: f64,
    pub adress: String,
    pub age: f64,
}

/// Result of [`AccountService::register`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered(RecordId),
    /// A user with this email already exists; nothing was saved.
    EmailTaken,
}

/// Account flows
#[derive(Clone)]
pub struct AccountService {
    users: UsersDao,
    notifier: Arc<dyn SignupNotifier>,
}

impl AccountService {
    pub fn new(users: UsersDao, notifier: Arc<dyn SignupNotifier>) -> Self {
        Self { users, notifier }
    }

    pub fn users(&self) -> &UsersDao {
        &self.users
    }

    /// Register a new user.
    ///
    /// The email check and the save are two separate container calls, so two
    /// concurrent registrations of one email can both succeed.
    pub async fn register(&self, new_user: NewUser) -> AccountResult<RegisterOutcome> {
        if self.users.get_by_email(&new_user.email).await?.is_some() {
            tracing::info!(email = %new_user.email, "registration rejected: email taken");
            return Ok(RegisterOutcome::EmailTaken);
        }

        let mut user = User {
            id: None,
            password: hash_password(&new_user.password)?,
            email: new_user.email,
            name: new_user.name,
            telephone: new_user.telephone,
            adress: new_user.adress,
            age: new_user.age,
        };
        let id = self.users.save_user(&user).await?;
        user.id = Some(id.clone());
        tracing::info!(%id, email = %user.email, "user registered");

        if let Err(e) = self.notifier.notify_signup(&user).await {
            tracing::warn!(%id, error = %e, "signup notification failed");
        }

        Ok(RegisterOutcome::Registered(id))
    }

    /// The user with this email, if `password` matches their stored hash.
    pub async fn authenticate(&self, email: &str, password: &str) -> AccountResult<Option<User>> {
        let Some(record) = self.users.get_by_email(email).await? else {
            tracing::debug!(email, "login failed: unknown email");
            return Ok(None);
        };

        let user: User = record
            .to_model()
            .map_err(|e| AccountError::InvalidRecord(e.to_string()))?;

        if verify_password(password, &user.password) {
            tracing::debug!(email, "login succeeded");
            Ok(Some(user))
        } else {
            tracing::debug!(email, "login failed: wrong password");
            Ok(None)
        }
    }
}
