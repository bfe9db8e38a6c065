use crate::storage::{self, DocumentCollection, DocumentStore, StoreError};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, warn};

/// Application state: one long-lived handle per collection
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn DocumentCollection>,
    pub gallery: Arc<dyn DocumentCollection>,
    pub reviews: Arc<dyn DocumentCollection>,
    pub blogs: Arc<dyn DocumentCollection>,
}

impl AppState {
    pub fn new(store: &dyn DocumentStore) -> Self {
        Self {
            services: store.collection(storage::SERVICES),
            gallery: store.collection(storage::GALLERY),
            reviews: store.collection(storage::REVIEWS),
            blogs: store.collection(storage::BLOGS),
        }
    }
}

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl Envelope<String> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Query parameters for `GET /reviews`
#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub email: Option<String>,
}

/// JSON body extractor whose rejections become failure envelopes.
///
/// A request without a JSON content type is read as an empty object;
/// malformed JSON is still rejected.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => {
                let empty = serde_json::from_value(Value::Object(Map::new()))
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                Ok(Self(empty))
            }
            Err(rejection) => Err(rejection.into()),
        }
    }
}

/// Query string extractor whose rejections become failure envelopes
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match &self {
            ApiError::Store(StoreError::Backend(_)) | ApiError::Internal(_) => {
                error!(error = %message, "Request failed")
            }
            _ => warn!(error = %message, "Request rejected"),
        }

        // Failures travel in the envelope, not the status line
        (StatusCode::OK, Envelope::failure(message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_envelope_wraps_payload() {
        let response = Envelope::ok(vec![1, 2, 3]).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "success": true, "data": [1, 2, 3] }));
    }

    #[tokio::test]
    async fn not_found_is_null_data() {
        let response = Envelope::ok(None::<Value>).into_response();
        assert_eq!(body_json(response).await, json!({ "success": true, "data": null }));
    }

    #[tokio::test]
    async fn errors_render_message_under_data() {
        let response = ApiError::Store(StoreError::Backend("server selection timeout".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "data": "server selection timeout" })
        );
    }
}
