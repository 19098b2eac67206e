use std::convert::TryFrom;

use crate::catalog::{self, PlayerItem};
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub skip: i64,
    pub limit: i64,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            skip: req.query_i64("skip")?,
            limit: req.query_i64("limit")?,
        })
    }
}

pub struct ListPlayerItemsController;

impl Handler for ListPlayerItemsController {
    type Request = Request;
    // Serializes as a bare JSON array of catalog records.
    type Response = &'static [PlayerItem];

    fn handle(&self, req: TypedHandlerRequest<Request>) -> &'static [PlayerItem] {
        catalog::slice(req.data.skip, req.data.limit)
    }
}
