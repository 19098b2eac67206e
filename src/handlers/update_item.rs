use serde::Serialize;
use serde_json::Value;
use std::convert::TryFrom;

use super::non_empty;
use super::types::{Item, UserAccount};
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub item_id: i64,
    pub q: Option<String>,
    pub item: Option<Item>,
    pub user: Option<UserAccount>,
}

fn section<T: serde::de::DeserializeOwned>(
    body: Option<&Value>,
    key: &str,
) -> anyhow::Result<Option<T>> {
    match body.and_then(|b| b.get(key)) {
        Some(v) if !v.is_null() => Ok(Some(serde_json::from_value(v.clone())?)),
        _ => Ok(None),
    }
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: req.path_i64("item_id")?,
            q: req.query_string_opt("q"),
            item: section(req.body.as_ref(), "item")?,
            user: section(req.body.as_ref(), "user")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAccount>,
}

pub struct UpdateItemController;

impl Handler for UpdateItemController {
    type Request = Request;
    type Response = Response;

    // Assembles whichever of {id, query, item, user} were supplied.
    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        let data = req.data;
        Response {
            item_id: data.item_id,
            q: non_empty(data.q),
            item: data.item,
            user: data.user,
        }
    }
}
