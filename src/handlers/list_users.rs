use serde::Serialize;
use std::convert::TryFrom;

use super::non_empty;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub q: Option<String>,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            q: req.query_string_opt("q"),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub user_name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub users: Vec<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

pub struct ListUsersController;

impl Handler for ListUsersController {
    type Request = Request;
    type Response = Response;

    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        Response {
            users: vec![
                UserSummary { user_name: "Rick" },
                UserSummary { user_name: "Morty" },
            ],
            q: non_empty(req.data.q),
        }
    }
}
