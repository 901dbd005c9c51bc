//! Request extractors that reject with [`RelayError`] instead of axum's
//! default rejections.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};

use crate::error::RelayError;
use crate::message::MessagePayload;

/// The single device id segment of the matched route.
///
/// A route without it is a router bug, so that rejection is a 500. An id that
/// is present but can't be decoded (e.g. `%FF`) matches no device: 404.
#[derive(Debug)]
pub struct DeviceId(pub String);

impl<S> FromRequestParts<S> for DeviceId
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                PathRejection::MissingPathParams(_) => RelayError::MissingPathParam,
                other => RelayError::NotFound(other.body_text()),
            })?;
        if id.is_empty() {
            return Err(RelayError::MissingPathParam);
        }
        Ok(Self(id))
    }
}

/// A validated `{"msg": "..."}` body.
///
/// The body is decoded whatever the `Content-Type` says. Any decode failure,
/// a missing `msg`, or an empty `msg` is a 400.
#[derive(Debug)]
pub struct MessageBody(pub MessagePayload);

impl<S> FromRequest<S> for MessageBody
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RelayError::Validation(e.body_text()))?;
        let payload: MessagePayload =
            serde_json::from_slice(&bytes).map_err(|e| RelayError::Validation(e.to_string()))?;
        if payload.msg.is_empty() {
            return Err(RelayError::Validation("msg is empty".to_string()));
        }
        Ok(Self(payload))
    }
}
