use std::convert::TryFrom;

use super::types::MessageResponse;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request;

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(_req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Request)
    }
}

pub struct PostRootController;

impl Handler for PostRootController {
    type Request = Request;
    type Response = MessageResponse;

    fn handle(&self, _req: TypedHandlerRequest<Request>) -> MessageResponse {
        MessageResponse {
            message: "post message".to_string(),
        }
    }
}
