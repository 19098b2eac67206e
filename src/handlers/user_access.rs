use serde::Serialize;
use std::convert::TryFrom;

use super::types::AccessType;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub user_type: AccessType,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_type: req.path_string("user_type")?.parse()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub user_type: AccessType,
    pub message: &'static str,
}

pub struct UserAccessController;

impl Handler for UserAccessController {
    type Request = Request;
    type Response = Response;

    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        let user_type = req.data.user_type;
        let message = match user_type {
            AccessType::SuperAdmin => "full access",
            AccessType::Admin => "partial access",
            AccessType::User => "normal user",
        };
        Response { user_type, message }
    }
}
