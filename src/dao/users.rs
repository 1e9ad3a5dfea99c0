//! Users DAO

use std::sync::Arc;

use super::models::User;
use crate::persistence::{Container, Record, RecordId, StorageResult};

/// Field used for identity lookups
pub const EMAIL_FIELD: &str = "email";

/// Registered-user façade.
///
/// The data layer does not enforce unique emails. [`UsersDao::get_by_email`]
/// scans every user and returns the first match in backend order, so callers
/// that need uniqueness check before saving.
#[derive(Clone)]
pub struct UsersDao {
    container: Arc<dyn Container>,
}

impl UsersDao {
    /// Default collection name
    pub const COLLECTION: &'static str = "usuarios";

    /// Wrap a container, normally a schema-validated one using
    /// [`Schema::users`](crate::persistence::Schema::users).
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self { container }
    }

    /// The backing container
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    pub async fn save(&self, record: Record) -> StorageResult<RecordId> {
        self.container.save(record).await
    }

    pub async fn get_all(&self) -> StorageResult<Vec<Record>> {
        self.container.get_all().await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> StorageResult<Option<Record>> {
        self.container.get_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: &RecordId) -> StorageResult<bool> {
        self.container.delete_by_id(id).await
    }

    /// First user whose `email` equals `email` exactly. Linear in the number
    /// of users.
    pub async fn get_by_email(&self, email: &str) -> StorageResult<Option<Record>> {
        let users = self.get_all().await?;
        let found = users
            .into_iter()
            .find(|u| u.get_str(EMAIL_FIELD) == Some(email));

        tracing::debug!(email, found = found.is_some(), "user lookup by email");
        Ok(found)
    }

    /// Typed variant of [`UsersDao::get_by_email`]
    pub async fn user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        self.get_by_email(email)
            .await?
            .map(|r| r.to_model())
            .transpose()
    }

    /// Save a typed user
    pub async fn save_user(&self, user: &User) -> StorageResult<RecordId> {
        self.save(Record::from_model(user)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{DocumentContainer, MemoryCollection, Schema, StorageError};
    use serde_json::json;

    fn dao() -> UsersDao {
        UsersDao::new(Arc::new(DocumentContainer::validated(
            MemoryCollection::new(UsersDao::COLLECTION),
            Schema::users(),
        )))
    }

    fn user(email: &str, name: &str) -> Record {
        Record::from_value(json!({
            "email": email,
            "password": "$argon2id$v=19$hash",
            "name": name,
            "telephone": 1155550000,
            "adress": "Calle 1",
            "age": 30
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_by_email_miss_then_hit() {
        let dao = dao();
        assert!(dao.get_by_email("a@x.com").await.unwrap().is_none());

        let input = user("a@x.com", "Ana");
        let id = dao.save(input.clone()).await.unwrap();

        let found = dao.get_by_email("a@x.com").await.unwrap();
        assert_eq!(found, Some(input.with_id(id)));
        assert!(dao.get_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_email_returns_first_duplicate() {
        let dao = dao();
        let first = dao.save(user("dup@x.com", "Primero")).await.unwrap();
        dao.save(user("dup@x.com", "Segundo")).await.unwrap();

        let found = dao.get_by_email("dup@x.com").await.unwrap().unwrap();
        assert_eq!(found.id(), Some(&first));
        assert_eq!(found.get_str("name"), Some("Primero"));
    }

    #[tokio::test]
    async fn test_typed_user() {
        let dao = dao();
        let ana = User {
            id: None,
            email: "ana@x.com".to_string(),
            password: "$argon2id$v=19$hash".to_string(),
            name: "Ana".to_string(),
            telephone: 1155550000.0,
            adress: "Calle 1".to_string(),
            age: 30.0,
        };
        let id = dao.save_user(&ana).await.unwrap();

        let stored = dao.user_by_email("ana@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.age, 30.0);
    }

    #[tokio::test]
    async fn test_schema_errors_propagate_verbatim() {
        let dao = dao();
        let mut incomplete = user("a@x.com", "Ana");
        incomplete.remove("telephone");

        let err = dao.save(incomplete).await.unwrap_err();
        match err {
            StorageError::Validation(v) => assert_eq!(v.fields(), vec!["telephone"]),
            other => panic!("expected validation error, got {other}"),
        }
        assert!(dao.get_all().await.unwrap().is_empty());
    }
}
