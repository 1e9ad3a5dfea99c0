//! Carts DAO

use serde_json::Value;
use std::sync::Arc;

use super::models::Cart;
use crate::persistence::{Container, Record, RecordId, StorageError, StorageResult};

/// Field holding the cart's product references
pub const PRODUCTS_FIELD: &str = "productos";

/// Shopping cart façade.
///
/// Guarantees every cart it saves carries a `productos` array, defaulting it
/// to `[]` when the caller left it out.
#[derive(Clone)]
pub struct CartsDao {
    container: Arc<dyn Container>,
}

impl CartsDao {
    /// Default collection name
    pub const COLLECTION: &'static str = "carritos";

    /// Wrap a container
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self { container }
    }

    /// The backing container
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Save a cart, defaulting an absent (or null) `productos` to `[]`.
    pub async fn save(&self, mut record: Record) -> StorageResult<RecordId> {
        if record.get(PRODUCTS_FIELD).map_or(true, Value::is_null) {
            record.insert(PRODUCTS_FIELD, Value::Array(Vec::new()));
        }
        self.container.save(record).await
    }

    /// Create an empty cart
    pub async fn create(&self) -> StorageResult<RecordId> {
        self.save(Record::new()).await
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

    /// One cart, typed
    pub async fn cart(&self, id: &RecordId) -> StorageResult<Option<Cart>> {
        self.get_by_id(id).await?.map(|r| r.to_model()).transpose()
    }

    /// Append a product reference to a cart.
    ///
    /// Returns `false` when the cart does not exist.
    pub async fn add_product(&self, cart_id: &RecordId, product: Value) -> StorageResult<bool> {
        let Some(mut cart) = self.get_by_id(cart_id).await? else {
            return Ok(false);
        };

        products_mut(&mut cart)?.push(product);
        self.save(cart).await?;
        Ok(true)
    }

    /// Remove the first reference to `product_id` from a cart.
    ///
    /// A reference matches when it is the id itself or an object whose `id`
    /// is that id. Returns `false` when the cart does not exist or holds no
    /// such product.
    pub async fn remove_product(
        &self,
        cart_id: &RecordId,
        product_id: &RecordId,
    ) -> StorageResult<bool> {
        let Some(mut cart) = self.get_by_id(cart_id).await? else {
            return Ok(false);
        };

        let products = products_mut(&mut cart)?;
        let Some(index) = products
            .iter()
            .position(|p| references(p, product_id))
        else {
            return Ok(false);
        };

        products.remove(index);
        self.save(cart).await?;
        Ok(true)
    }
}

fn products_mut(cart: &mut Record) -> StorageResult<&mut Vec<Value>> {
    let products = cart
        .fields_mut()
        .entry(PRODUCTS_FIELD)
        .or_insert_with(|| Value::Array(Vec::new()));
    if products.is_null() {
        *products = Value::Array(Vec::new());
    }

    products.as_array_mut().ok_or_else(|| {
        StorageError::serialization(format!("cart field `{}` is not an array", PRODUCTS_FIELD))
    })
}

fn references(value: &Value, product_id: &RecordId) -> bool {
    let candidate = match value {
        Value::Object(map) => map.get("id").or_else(|| map.get("_id")),
        other => Some(other),
    };
    candidate
        .and_then(RecordId::from_value)
        .is_some_and(|id| &id == product_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{DocumentContainer, FileContainer, MemoryCollection, Schema};
    use serde_json::json;
    use tempfile::TempDir;

    fn memory_dao() -> CartsDao {
        CartsDao::new(Arc::new(DocumentContainer::validated(
            MemoryCollection::new(CartsDao::COLLECTION),
            Schema::carts(),
        )))
    }

    #[tokio::test]
    async fn test_missing_productos_defaults_to_empty() {
        let dao = memory_dao();

        let id = dao.save(Record::new()).await.unwrap();
        let stored = dao.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.get(PRODUCTS_FIELD), Some(&json!([])));

        let id = dao
            .save(Record::from_value(json!({"productos": null})).unwrap())
            .await
            .unwrap();
        let cart = dao.cart(&id).await.unwrap().unwrap();
        assert!(cart.productos.is_empty());
    }

    #[tokio::test]
    async fn test_given_productos_are_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let container = FileContainer::new(temp_dir.path().join("carritos.json")).unwrap();
        let dao = CartsDao::new(Arc::new(container));

        let input = Record::from_value(json!({"productos": [{"id": "3", "qty": 2}]})).unwrap();
        let id = dao.save(input.clone()).await.unwrap();
        assert_eq!(dao.get_by_id(&id).await.unwrap(), Some(input.with_id(id)));
    }

    #[tokio::test]
    async fn test_add_and_remove_products() {
        let dao = memory_dao();
        let cart_id = dao.create().await.unwrap();

        assert!(dao.add_product(&cart_id, json!("7")).await.unwrap());
        assert!(dao
            .add_product(&cart_id, json!({"id": "9", "title": "Regla"}))
            .await
            .unwrap());
        assert!(dao.add_product(&cart_id, json!(7)).await.unwrap());

        let cart = dao.cart(&cart_id).await.unwrap().unwrap();
        assert_eq!(cart.productos.len(), 3);

        // First match only
        assert!(dao.remove_product(&cart_id, &RecordId::new("7")).await.unwrap());
        let cart = dao.cart(&cart_id).await.unwrap().unwrap();
        assert_eq!(cart.productos, vec![json!({"id": "9", "title": "Regla"}), json!(7)]);

        assert!(dao.remove_product(&cart_id, &RecordId::new("9")).await.unwrap());
        assert!(!dao.remove_product(&cart_id, &RecordId::new("9")).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_cart() {
        let dao = memory_dao();
        let ghost = RecordId::new("nope");

        assert!(!dao.add_product(&ghost, json!("1")).await.unwrap());
        assert!(!dao.remove_product(&ghost, &RecordId::new("1")).await.unwrap());
        assert!(dao.cart(&ghost).await.unwrap().is_none());
        assert!(!dao.delete_by_id(&ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_array_productos_is_rejected() {
        let dao = CartsDao::new(Arc::new(DocumentContainer::schemaless(MemoryCollection::new(
            CartsDao::COLLECTION,
        ))));

        let id = dao
            .save(Record::from_value(json!({"productos": "roto"})).unwrap())
            .await
            .unwrap();
        let err = dao.add_product(&id, json!("1")).await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        assert_eq!(dao.get_all().await.unwrap().len(), 1);
    }
}
