use anyhow::anyhow;
use serde::Serialize;
use std::convert::TryFrom;

use super::types::UserAccount;
use crate::dispatcher::HandlerRequest;
use crate::typed::{Handler, TypedHandlerRequest};

#[derive(Debug)]
pub struct Request {
    pub account: UserAccount,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> Result<Self, Self::Error> {
        let body = req.body.ok_or_else(|| anyhow!("missing request body"))?;
        Ok(Self {
            account: serde_json::from_value(body)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Response {
    #[serde(flatten)]
    pub account: UserAccount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_with_tax: Option<f64>,
}

pub struct CreateUserController;

impl Handler for CreateUserController {
    type Request = Request;
    type Response = Response;

    // A zero tax suppresses the computed field entirely.
    fn handle(&self, req: TypedHandlerRequest<Request>) -> Response {
        let account = req.data.account;
        let salary_with_tax = (account.tax != 0.0).then(|| account.salary as f64 + account.tax);
        Response {
            account,
            salary_with_tax,
        }
    }
}
