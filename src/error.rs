use axum::{Json, http::StatusCode, response::IntoResponse};
use oauth2::basic::BasicErrorResponseType;
use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{HttpClientError, RequestTokenError, StandardErrorResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HubError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("authorization code not found in callback")]
    MissingCode,

    #[error("anti-forgery state missing or mismatched")]
    InvalidState,

    #[error("authorization code invalid or already used")]
    InvalidGrant,

    #[error("Google account not connected")]
    NotConnected,

    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("calendar fetch failed: {0}")]
    FetchFailed(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("email already in use")]
    DuplicateEmail,

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Storage(#[from] SqlxError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl
    From<
        RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    > for HubError
{
    fn from(
        e: RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    ) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => match err.error() {
                BasicErrorResponseType::InvalidGrant => HubError::InvalidGrant,
                other => HubError::ExchangeFailed(other.to_string()),
            },
            RequestTokenError::Request(req_e) => {
                HubError::ExchangeFailed(format!("request failed: {}", req_e))
            }
            RequestTokenError::Parse(parse_err, _body) => {
                HubError::ExchangeFailed(format!("malformed token response: {}", parse_err))
            }
            RequestTokenError::Other(s) => HubError::ExchangeFailed(s),
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match &self {
            HubError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHENTICATED".to_string(),
                    message: "Authentication required.".to_string(),
                },
            ),
            HubError::MissingCode => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "MISSING_CODE".to_string(),
                    message: "Authorization code not found.".to_string(),
                },
            ),
            HubError::InvalidState => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_STATE".to_string(),
                    message: "Invalid state parameter.".to_string(),
                },
            ),
            HubError::InvalidGrant => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_GRANT".to_string(),
                    message: "Authorization code invalid or already used.".to_string(),
                },
            ),
            HubError::NotConnected => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "NOT_CONNECTED".to_string(),
                    message: "Google account not connected.".to_string(),
                },
            ),
            HubError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION".to_string(),
                    message: msg.clone(),
                },
            ),
            HubError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION".to_string(),
                    message: "Email already in use.".to_string(),
                },
            ),
            HubError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "Record not found.".to_string(),
                },
            ),
            // Provider and storage failures answer with generic bodies; the
            // detailed cause is logged at the component boundary and never
            // carries token material back to the caller.
            HubError::ExchangeFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "EXCHANGE_FAILED".to_string(),
                    message: "Failed to exchange token with provider.".to_string(),
                },
            ),
            HubError::FetchFailed(_) | HubError::Http(_) | HubError::UrlParse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "FETCH_FAILED".to_string(),
                    message: "Failed to fetch events.".to_string(),
                },
            ),
            HubError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "STORAGE_FAILURE".to_string(),
                    message: "Failed to store record.".to_string(),
                },
            ),
            HubError::Json(_) | HubError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
