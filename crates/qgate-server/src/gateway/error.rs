//! Mapping of gateway failures onto plain-text HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use qgate_core::GatewayError;

/// A per-request failure, rendered as a plain-text error response.
#[derive(Debug)]
pub struct QueryFailure(pub GatewayError);

impl QueryFailure {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GatewayError> for QueryFailure {
    fn from(err: GatewayError) -> Self {
        QueryFailure(err)
    }
}

impl IntoResponse for QueryFailure {
    fn into_response(self) -> Response {
        (self.status(), self.0.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::BadRequest("missing field `ip`".into()), StatusCode::BAD_REQUEST),
            (GatewayError::Timeout(Duration::from_secs(15)), StatusCode::GATEWAY_TIMEOUT),
            (GatewayError::Parse("eof".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GatewayError::Domain("timeout".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (GatewayError::Subprocess("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(QueryFailure(err).status(), expected);
        }
    }

    #[test]
    fn test_bodies_are_distinct() {
        assert!(GatewayError::Parse("eof".into()).to_string().starts_with("parse error"));
        assert_eq!(GatewayError::Domain("timeout".into()).to_string(), "timeout");
        assert_eq!(GatewayError::Subprocess("boom".into()).to_string(), "boom");
    }
}
