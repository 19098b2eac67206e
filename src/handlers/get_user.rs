use std::convert::TryFrom;

use super::types::MessageResponse;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub user_id: String,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: req.path_string("user_id")?,
        })
    }
}

pub struct GetUserController;

impl Handler for GetUserController {
    type Request = Request;
    type Response = MessageResponse;

    // No existence check: any id is reported found.
    fn handle(&self, req: TypedHandlerRequest<Request>) -> MessageResponse {
        MessageResponse {
            message: format!("user {} found", req.data.user_id),
        }
    }
}
