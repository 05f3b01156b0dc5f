//! # Request Extraction
//!
//! JSON bodies and query strings are taken as `Result<_, Rejection>` so a
//! malformed request becomes an [`AppError::BadRequest`] with the standard
//! error body instead of Axum's plain-text rejection.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use pop_core::Timestamp;
use serde::Deserialize;

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// `?at=<unix seconds>` on read endpoints that depend on time.
#[derive(Debug, Default, Deserialize)]
pub struct AtQuery {
    pub at: Option<i64>,
}

impl AtQuery {
    /// The requested instant, or now.
    pub fn resolve(self) -> Result<Timestamp, AppError> {
        match self.at {
            Some(secs) => Ok(Timestamp::from_epoch_secs(secs)?),
            None => Ok(Timestamp::now()),
        }
    }
}

/// Extract and resolve an [`AtQuery`].
pub fn extract_at(result: Result<Query<AtQuery>, QueryRejection>) -> Result<Timestamp, AppError> {
    result
        .map(|Query(q)| q)
        .map_err(|err| AppError::BadRequest(err.body_text()))?
        .resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_instant_is_used() {
        let at = AtQuery { at: Some(1_700_000_000) }.resolve().unwrap();
        assert_eq!(at.epoch_secs(), 1_700_000_000);
    }

    #[test]
    fn out_of_range_instant_is_validation_error() {
        let err = AtQuery { at: Some(i64::MAX) }.resolve().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn missing_instant_means_now() {
        let before = Timestamp::now();
        let at = AtQuery::default().resolve().unwrap();
        assert!(at >= before);
    }
}
