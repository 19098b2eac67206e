//! # Handlers Module
//!
//! One module per route handler, each defining a typed `Request` built via
//! `TryFrom<HandlerRequest>`, a serializable `Response`, and a controller
//! implementing [`crate::typed::Handler`]. Handlers run after the shape pass,
//! so conversions here only fail when a handler disagrees with the route
//! table about what was declared.

pub mod types;

pub mod create_user;
pub mod current_user;
pub mod get_player_item;
pub mod get_root;
pub mod get_user;
pub mod get_user_player_item;
pub mod hidden_users;
pub mod list_all_users;
pub mod list_player_items;
pub mod list_users;
pub mod post_root;
pub mod put_root;
pub mod update_item;
pub mod update_user;
pub mod user_access;

/// Optional-string presence rule: an empty value behaves like an omitted one.
/// Applied uniformly after validation, never inside the validator.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
