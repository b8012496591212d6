use std::future::Future;
use std::pin::Pin;

use crate::error::GrokError;
use crate::model::ChatRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub type ModelGatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, GrokError>> + 'a>>;

pub trait ModelGateway {
    fn send<'a>(&'a self, api_key: &'a str, request: &'a ChatRequest) -> ModelGatewayFuture<'a>;
}
