use anyhow::anyhow;
use serde::Serialize;
use std::convert::TryFrom;

use super::non_empty;
use super::types::User;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub user_id: i64,
    pub q: Option<String>,
    pub user: User,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        let body = req
            .body
            .clone()
            .ok_or_else(|| anyhow!("missing request body"))?;
        Ok(Self {
            user_id: req.path_i64("user_id")?,
            q: req.query_string_opt("q"),
            user: serde_json::from_value(body)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

pub struct UpdateUserController;

impl Handler for UpdateUserController {
    type Request = Request;
    type Response = Response;

    // The path id wins over whatever id the body carried.
    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        let data = req.data;
        let mut user = data.user;
        user.user_id = data.user_id;
        Response {
            user,
            q: non_empty(data.q),
        }
    }
}
