//! Domain types shared across handlers.

use crate::shape::fits_i64;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed description string attached to item lookups unless `short` is set.
pub const ITEM_DESCRIPTION: &str = "This is an amazing item that has a long description";

/// Closed set of access levels.
///
/// Serialized in snake_case on the wire (`super_admin`); privilege order is
/// expressed by the role-access handler, not by declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    User,
    Admin,
    SuperAdmin,
}

impl AccessType {
    /// Wire-format names, in declaration order. The route table uses this as
    /// the enum constraint for `user_type`.
    pub const VALUES: &'static [&'static str] = &["user", "admin", "super_admin"];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::User => "user",
            AccessType::Admin => "admin",
            AccessType::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AccessType::User),
            "admin" => Ok(AccessType::Admin),
            "super_admin" => Ok(AccessType::SuperAdmin),
            other => Err(anyhow!("unknown access type `{other}`")),
        }
    }
}

/// Integer fields accept integral floats (`5.0`) the same way the shape pass
/// does. Exact JSON integers keep full i64 precision; a float must be
/// integral and within i64's range, anything else is an error.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if fits_i64(f) => Ok(f as i64),
        _ => Err(serde::de::Error::custom(format!(
            "expected integer, found {n}"
        ))),
    }
}

/// Account shape accepted by `create_user` and embedded in `update_item`
/// bodies under the `user` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    #[serde(rename = "type")]
    pub access_type: AccessType,
    #[serde(deserialize_with = "lenient_i64")]
    pub salary: i64,
    #[serde(default)]
    pub tax: f64,
}

/// User shape accepted by `update_user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient_i64")]
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Inventory item shape embedded in `update_item` bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "lenient_i64")]
    pub item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub item_stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Single-message response shape shared by the fixed-text handlers.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
