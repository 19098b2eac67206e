pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use request::{parse_query_params, parse_request, ParsedRequest};

pub use http_server::{HttpServer, ServerHandle};
pub use service::{health_endpoint, AppService};
