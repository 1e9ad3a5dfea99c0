//! Sign-up notifications

use async_trait::async_trait;

use crate::dao::User;

/// Told about every successful registration.
///
/// Failures are logged by the caller and never undo the registration.
#[async_trait]
pub trait SignupNotifier: Send + Sync {
    async fn notify_signup(&self, user: &User) -> anyhow::Result<()>;
}

/// Notifier that records each sign-up as a `tracing` event addressed to an
/// operator. The password hash is never included.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    recipient: Option<String>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the events to `recipient`
    pub fn with_recipient<T: Into<String>>(mut self, recipient: T) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }
}

#[async_trait]
impl SignupNotifier for LogNotifier {
    async fn notify_signup(&self, user: &User) -> anyhow::Result<()> {
        tracing::info!(
            recipient = self.recipient.as_deref().unwrap_or("-"),
            email = %user.email,
            name = %user.name,
            telephone = user.telephone,
            adress = %user.adress,
            age = user.age,
            "new user registered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notifier = LogNotifier::new().with_recipient("ops@example.com");
        assert_eq!(notifier.recipient(), Some("ops@example.com"));

        let user = User {
            id: None,
            email: "ana@x.com".to_string(),
            password: "$argon2id$v=19$hash".to_string(),
            name: "Ana".to_string(),
            telephone: 1155550000.0,
            adress: "Calle 1".to_string(),
            age: 30.0,
        };
        assert!(notifier.notify_signup(&user).await.is_ok());
        assert!(LogNotifier::new().notify_signup(&user).await.is_ok());
    }
}
