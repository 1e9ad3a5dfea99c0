//! Typed views of the stored entities
//!
//! Containers store untyped [`Record`](crate::persistence::Record)s; these
//! structs are what callers usually want back. Convert with
//! `Record::from_model` and `Record::to_model`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persistence::RecordId;

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub title: String,
    pub price: f64,
    /// Image URL
    pub thumbnail: String,
}

impl Product {
    /// A product not yet persisted
    pub fn new<T: Into<String>, U: Into<String>>(title: T, price: f64, thumbnail: U) -> Self {
        Self {
            id: None,
            title: title.into(),
            price,
            thumbnail: thumbnail.into(),
        }
    }
}

/// Shopping cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Product references (ids or embedded products), in insertion order
    #[serde(default)]
    pub productos: Vec<Value>,
}

/// Registered user. `password` always holds a one-way hash.
///
/// `telephone` and `age` are plain numbers, as [`Schema::users`] declares
/// them, so any record the users schema accepts converts into a `User`.
///
/// [`Schema::users`]: crate::persistence::Schema::users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub email: String,
    pub password: String,
    pub name: String,
    pub telephone: f64,
    pub adress: String,
    pub age: f64,
}
