use serde::Serialize;
use std::convert::TryFrom;

use super::non_empty;
use super::types::ITEM_DESCRIPTION;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub player_item_id: i64,
    pub sample_query: String,
    pub optional_query: Option<String>,
    pub short: bool,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            player_item_id: req.path_i64("player_item_id")?,
            sample_query: req.query_string("sample_query")?,
            optional_query: req.query_string_opt("optional_query"),
            short: req.query_bool("short")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub player_item_id: i64,
    pub sample_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

pub struct GetPlayerItemController;

impl Handler for GetPlayerItemController {
    type Request = Request;
    type Response = Response;

    // The id is echoed, not looked up against the catalog.
    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        let data = req.data;
        Response {
            player_item_id: data.player_item_id,
            sample_query: data.sample_query,
            optional_query: non_empty(data.optional_query),
            description: (!data.short).then_some(ITEM_DESCRIPTION),
        }
    }
}
