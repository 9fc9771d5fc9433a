use axum::{
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    http::Method,
    response::{IntoResponse, Response},
};

use super::PageRequest;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum PageError {
    #[error("Failed to read form body: {0}")]
    Body(#[from] BytesRejection),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            // keeps 413 for oversized bodies and 400 for broken streams
            Self::Body(rejection) => rejection.into_response(),
        }
    }
}

/// Builds a [`PageRequest`] without looking at the content type
///
/// The body is only read for `POST`, and any bytes that arrive are parsed
/// leniently, so the only rejections come from reading the body itself.
impl<S> FromRequest<S> for PageRequest
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();

        if method != Method::POST {
            return Ok(Self::new(method, path, &[]));
        }

        let body = Bytes::from_request(request, state).await?;
        Ok(Self::new(method, path, &body))
    }
}
