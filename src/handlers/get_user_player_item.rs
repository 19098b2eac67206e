use serde::Serialize;
use std::convert::TryFrom;

use super::non_empty;
use super::types::ITEM_DESCRIPTION;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub user_id: i64,
    pub player_item_id: String,
    pub optional_query: Option<String>,
    pub short: bool,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: req.path_i64("user_id")?,
            player_item_id: req.path_string("player_item_id")?,
            optional_query: req.query_string_opt("optional_query"),
            short: req.query_bool("short")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub player_item_id: String,
    pub owner_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

pub struct GetUserPlayerItemController;

impl Handler for GetUserPlayerItemController {
    type Request = Request;
    type Response = Response;

    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        let data = req.data;
        Response {
            player_item_id: data.player_item_id,
            owner_id: data.user_id,
            optional_query: non_empty(data.optional_query),
            description: (!data.short).then_some(ITEM_DESCRIPTION),
        }
    }
}
