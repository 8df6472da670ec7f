use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Envelope for every JSON body the API returns:
/// ```json
/// {
///   "success": true,
///   "data": { "code": "RQ3FA09C", "status": "accepted" },
///   "message": "Ticket created"
/// }
/// ```
///
/// Error bodies carry `data: null` (`ApiResponse::<()>`) and a human-readable message.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error response; `data` is `T::default()`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Shorthand for an error reply with no payload.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::<()>::error(message)))
}
