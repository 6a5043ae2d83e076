use academia_core::{AppError, Role, UserIdentity};
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;

const SUBJECT_HEADER: &str = "x-auth-subject";
const DISPLAY_NAME_HEADER: &str = "x-auth-display-name";
const ROLE_HEADER: &str = "x-auth-role";

/// Resolves the actor identity forwarded by the upstream auth proxy and
/// stores it in request extensions for handlers to extract.
pub async fn require_identity(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn identity_from_headers(headers: &HeaderMap) -> Result<UserIdentity, AppError> {
    let subject = required_header(headers, SUBJECT_HEADER)?;
    let display_name = required_header(headers, DISPLAY_NAME_HEADER)?;
    let role = required_header(headers, ROLE_HEADER)?
        .parse::<Role>()
        .map_err(|_| AppError::Unauthorized("unrecognized role header value".to_owned()))?;

    Ok(UserIdentity::new(subject, display_name, role))
}

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| AppError::Unauthorized(format!("missing or invalid {name} header")))
}
