use serde::Serialize;
use std::convert::TryFrom;

use super::non_empty;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub hidden_query: Option<String>,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            hidden_query: req.query_string_opt("hidden_query"),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub hidden_query: String,
}

pub struct HiddenUsersController;

impl Handler for HiddenUsersController {
    type Request = Request;
    type Response = Response;

    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        Response {
            hidden_query: non_empty(req.data.hidden_query)
                .unwrap_or_else(|| "not found".to_string()),
        }
    }
}
