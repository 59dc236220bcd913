// Standard library
use std::sync::Arc;

// 3rd party crates
use async_trait::async_trait;
use reqwest::{Client, Request, Response};

// Current module imports
use super::traits::Executor;

#[async_trait]
impl Executor for Client {
    type Error = reqwest::Error;

    async fn execute(&self, request: Request) -> Result<Response, Self::Error> {
        Client::execute(self, request).await
    }
}

#[async_trait]
impl<E> Executor for Arc<E>
where
    E: Executor + ?Sized,
{
    type Error = E::Error;

    async fn execute(&self, request: Request) -> Result<Response, Self::Error> {
        (**self).execute(request).await
    }
}
