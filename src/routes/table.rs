use super::shapes::{ACCOUNT_SHAPE, UPDATE_ITEM_BODY, USER_SHAPE};
use super::{ParamMeta, RouteMeta};
use crate::handlers::types::AccessType;
use crate::shape::{BodySpec, FieldSpec};
use http::Method;
use serde_json::json;
use std::sync::Arc;

/// Build the route table.
///
/// Order matters for matching: literal segments must come before parameter
/// segments on the same prefix (`/users/current` before `/users/{user_id}`),
/// because the router scans the table in declaration order.
pub fn routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/", "get_root", "Root message"),
        RouteMeta::new(Method::POST, "/", "post_root", "Root message for POST"),
        RouteMeta::new(Method::PUT, "/", "put_root", "Root message for PUT"),
        RouteMeta::new(Method::GET, "/users", "list_users", "List users")
            .param(ParamMeta::query("q", FieldSpec::string().length(2, 10))),
        RouteMeta::new(Method::GET, "/users_all", "list_all_users", "List all users"),
        RouteMeta::new(Method::GET, "/users/current", "current_user", "Current user"),
        RouteMeta::new(Method::GET, "/users/{user_id}", "get_user", "Look up a user")
            .param(ParamMeta::path("user_id", FieldSpec::string())),
        RouteMeta::new(
            Method::GET,
            "/users/{user_id}/player_items/{player_item_id}",
            "get_user_player_item",
            "Item owned by a user",
        )
        .param(ParamMeta::path("user_id", FieldSpec::integer()))
        .param(ParamMeta::path("player_item_id", FieldSpec::string()))
        .param(ParamMeta::query("optional_query", FieldSpec::string()))
        .param(ParamMeta::query("short", FieldSpec::boolean()).default_value(json!(false))),
        RouteMeta::new(Method::POST, "/users", "create_user", "Create a user account")
            .body(BodySpec::Required(Arc::clone(&ACCOUNT_SHAPE))),
        RouteMeta::new(Method::PUT, "/users/{user_id}", "update_user", "Update a user")
            .param(ParamMeta::path("user_id", FieldSpec::integer()))
            .param(ParamMeta::query("q", FieldSpec::string()))
            .body(BodySpec::Required(Arc::clone(&USER_SHAPE))),
        RouteMeta::new(Method::GET, "/users_hidden", "hidden_users", "Hidden user lookup")
            .param(ParamMeta::query("hidden_query", FieldSpec::string()).undocumented()),
        RouteMeta::new(
            Method::GET,
            "/access/{user_type}",
            "user_access",
            "Access level for a user type",
        )
        .param(ParamMeta::path(
            "user_type",
            FieldSpec::enumeration(AccessType::VALUES),
        )),
        RouteMeta::new(
            Method::GET,
            "/player_items",
            "list_player_items",
            "List catalog items",
        )
        .param(ParamMeta::query("skip", FieldSpec::integer()).default_value(json!(0)))
        .param(ParamMeta::query("limit", FieldSpec::integer()).default_value(json!(5))),
        RouteMeta::new(
            Method::GET,
            "/player_items/{player_item_id}",
            "get_player_item",
            "Look up a catalog item",
        )
        .param(ParamMeta::path("player_item_id", FieldSpec::integer()))
        .param(ParamMeta::query("sample_query", FieldSpec::string()).required())
        .param(ParamMeta::query("optional_query", FieldSpec::string()))
        .param(ParamMeta::query("short", FieldSpec::boolean()).default_value(json!(false))),
        RouteMeta::new(Method::PUT, "/items/{item_id}", "update_item", "Update an item")
            .param(ParamMeta::path("item_id", FieldSpec::integer().range(0, 50)))
            .param(ParamMeta::query("q", FieldSpec::string()))
            .body(BodySpec::Optional(Arc::clone(&UPDATE_ITEM_BODY))),
    ]
}
