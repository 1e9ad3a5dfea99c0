//! Integration tests for the MongoDB-backed document container
//!
//! Needs a running server. Start one with:
//!   docker run -d -p 27017:27017 --name storekit-mongo mongo:7
//! then run:
//!   cargo test --features "storage-mongodb" --test mongodb_integration -- --ignored --nocapture
//!
//! Set `MONGO_URL` to point somewhere else.

#[cfg(feature = "storage-mongodb")]
mod tests {
    use serde_json::json;
    use std::sync::Arc;
    use storekit::dao::{CartsDao, Product, ProductsDao, UsersDao};
    use storekit::persistence::{
        Container, DocumentContainer, MongoCollection, Record, RecordId, Schema,
    };

    const DEFAULT_URL: &str = "mongodb://localhost:27017";
    const TEST_DB: &str = "test_storekit";

    fn url() -> String {
        std::env::var("MONGO_URL").unwrap_or_else(|_| DEFAULT_URL.to_string())
    }

    /// A fresh, uniquely named collection so runs don't see each other
    async fn collection(prefix: &str) -> MongoCollection {
        let name = format!("{}_{}", prefix, uuid::Uuid::new_v4().simple());
        match MongoCollection::connect(&url(), TEST_DB, &name).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to connect: {}", e);
                eprintln!("Make sure MongoDB is running:");
                eprintln!("  docker run -d -p 27017:27017 --name storekit-mongo mongo:7");
                panic!("connection failed");
            }
        }
    }

    async fn drop_collection(container: &DocumentContainer<MongoCollection>) {
        container
            .collection()
            .collection()
            .drop()
            .await
            .expect("Failed to drop test collection");
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB server"]
    async fn test_mongodb_availability() {
        let container = DocumentContainer::schemaless(collection("ping").await);
        assert!(container.is_available().await, "MongoDB not reachable at {}", url());
        assert_eq!(container.backend_type(), "document");
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB server"]
    async fn test_mongodb_crud() {
        let container = DocumentContainer::schemaless(collection("productos").await);
        assert!(container.get_all().await.unwrap().is_empty());

        let lapiz = Record::from_value(json!({"title": "Lapiz", "price": 120.5})).unwrap();
        let id = container.save(lapiz.clone()).await.expect("Failed to save");
        // Generated ids are ObjectId hex strings
        assert_eq!(id.as_str().len(), 24);

        let stored = container.get_by_id(&id).await.unwrap();
        assert_eq!(stored, Some(lapiz.with_id(id.clone())));

        // Save with id replaces
        let updated = Record::from_value(json!({"title": "Lapiz", "price": 99})).unwrap();
        assert_eq!(container.save(updated.with_id(id.clone())).await.unwrap(), id);
        assert_eq!(container.get_all().await.unwrap().len(), 1);

        assert!(container.delete_by_id(&id).await.unwrap());
        assert!(!container.delete_by_id(&id).await.unwrap());
        assert!(container.get_by_id(&id).await.unwrap().is_none());

        // Unknown non-ObjectId ids are a miss, not an error
        assert!(container.get_by_id(&RecordId::new("7")).await.unwrap().is_none());

        drop_collection(&container).await;
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB server"]
    async fn test_mongodb_custom_string_ids() {
        let container = DocumentContainer::schemaless(collection("productos").await);

        let custom = RecordId::new("sku-42");
        let regla = Record::from_value(json!({"title": "Regla"})).unwrap();
        assert_eq!(container.save(regla.clone().with_id(custom.clone())).await.unwrap(), custom);

        assert_eq!(container.get_by_id(&custom).await.unwrap(), Some(regla.with_id(custom.clone())));
        assert!(container.delete_by_id(&custom).await.unwrap());
        assert!(container.get_by_id(&custom).await.unwrap().is_none());

        drop_collection(&container).await;
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB server"]
    async fn test_mongodb_users_schema() {
        let container = Arc::new(DocumentContainer::validated(
            collection(UsersDao::COLLECTION).await,
            Schema::users(),
        ));
        let users = UsersDao::new(container.clone());

        let err = users
            .save(Record::from_value(json!({"email": "a@x.com"})).unwrap())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(users.get_all().await.unwrap().is_empty());

        let ana = Record::from_value(json!({
            "email": "ana@x.com",
            "password": "$argon2id$v=19$hash",
            "name": "Ana",
            "telephone": "1155550000",
            "adress": "Calle 1",
            "age": 30
        }))
        .unwrap();
        let id = users.save(ana).await.unwrap();

        let found = users.get_by_email("ana@x.com").await.unwrap().unwrap();
        assert_eq!(found.id(), Some(&id));
        // Numeric strings are cast on save
        assert_eq!(found.get("telephone"), Some(&json!(1155550000)));

        drop_collection(&container).await;
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB server"]
    async fn test_mongodb_daos() {
        let productos = Arc::new(DocumentContainer::schemaless(
            collection(ProductsDao::COLLECTION).await,
        ));
        let carritos = Arc::new(DocumentContainer::validated(
            collection(CartsDao::COLLECTION).await,
            Schema::carts(),
        ));
        let products = ProductsDao::new(productos.clone());
        let carts = CartsDao::new(carritos.clone());

        let product_id = products
            .save_product(&Product::new("Regla", 80.0, "https://cdn.example.com/regla.png"))
            .await
            .unwrap();

        let cart_id = carts.create().await.unwrap();
        assert!(carts
            .add_product(&cart_id, json!({"id": product_id.as_str(), "title": "Regla"}))
            .await
            .unwrap());
        assert_eq!(carts.cart(&cart_id).await.unwrap().unwrap().productos.len(), 1);

        assert!(carts.remove_product(&cart_id, &product_id).await.unwrap());
        assert!(carts.cart(&cart_id).await.unwrap().unwrap().productos.is_empty());

        drop_collection(&productos).await;
        drop_collection(&carritos).await;
    }
}
