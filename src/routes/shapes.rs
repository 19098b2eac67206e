//! Shared request body shapes.
//!
//! Body shapes are reference-counted so routes that accept the same object
//! (directly or nested) share one definition.

use crate::handlers::types::AccessType;
use crate::shape::{FieldDef, FieldSpec, ObjectShape};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Body of `PUT /users/{user_id}`.
pub static USER_SHAPE: Lazy<Arc<ObjectShape>> = Lazy::new(|| {
    Arc::new(ObjectShape {
        name: "User",
        fields: vec![
            FieldDef::required("user_id", FieldSpec::integer()),
            FieldDef::optional("user_name", FieldSpec::string()),
        ],
    })
});

/// Body of `POST /users`. The `type` field is restricted to the known
/// access levels and `tax` may be omitted entirely.
pub static ACCOUNT_SHAPE: Lazy<Arc<ObjectShape>> = Lazy::new(|| {
    Arc::new(ObjectShape {
        name: "UserAccount",
        fields: vec![
            FieldDef::required("username", FieldSpec::string()),
            FieldDef::required("password", FieldSpec::string()),
            FieldDef::required("type", FieldSpec::enumeration(AccessType::VALUES)),
            FieldDef::required("salary", FieldSpec::integer()),
            FieldDef::optional("tax", FieldSpec::number()),
        ],
    })
});

/// Inventory item shape, nested inside [`UPDATE_ITEM_BODY`].
pub static ITEM_SHAPE: Lazy<Arc<ObjectShape>> = Lazy::new(|| {
    Arc::new(ObjectShape {
        name: "Item",
        fields: vec![
            FieldDef::required("item_id", FieldSpec::integer()),
            FieldDef::optional("item_name", FieldSpec::string()),
            FieldDef::required("item_stock", FieldSpec::integer()),
            FieldDef::optional("description", FieldSpec::string()),
        ],
    })
});

/// Body of `PUT /items/{item_id}`: both sections are optional, but when one
/// is present it is validated in full.
pub static UPDATE_ITEM_BODY: Lazy<Arc<ObjectShape>> = Lazy::new(|| {
    Arc::new(ObjectShape {
        name: "UpdateItemBody",
        fields: vec![
            FieldDef::optional("item", FieldSpec::object(Arc::clone(&ITEM_SHAPE))),
            FieldDef::optional("user", FieldSpec::object(Arc::clone(&ACCOUNT_SHAPE))),
        ],
    })
});
