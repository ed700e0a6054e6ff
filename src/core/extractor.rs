use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::{AuthenticatedUser, Capability};

/// JSON body extractor that rejects with the `ApiResponse` error envelope.
///
/// A body that parses but does not fit the target type (unknown enum value,
/// wrong field type, missing required field) is a validation failure. Broken
/// syntax and a missing content type are bad requests.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::Validation(err.body_text()),
            JsonRejection::JsonSyntaxError(err) => {
                AppError::BadRequest(format!("Malformed JSON body: {}", err.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// The caller put in the request extensions by `auth_middleware`
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        user.authorize(Capability::Authenticated)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    use crate::features::matches::models::MatchStatus;

    #[derive(Debug, Deserialize)]
    struct StatusBody {
        status: MatchStatus,
    }

    async fn extract(body: &str, content_type: Option<&str>) -> Result<StatusBody, AppError> {
        let mut builder = Request::builder().method("PATCH").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        AppJson::<StatusBody>::from_request(request, &())
            .await
            .map(|AppJson(body)| body)
    }

    #[tokio::test]
    async fn test_caller_comes_from_request_extensions() {
        let caller = crate::shared::test_helpers::regular_user();
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let missing = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(missing, Err(AppError::Unauthorized(_))));

        parts.extensions.insert(caller.clone());
        let found = AuthenticatedUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.id, caller.id);
    }

    #[tokio::test]
    async fn test_well_formed_body_is_extracted() {
        let body = extract(r#"{"status":"confirmed"}"#, Some("application/json"))
            .await
            .unwrap();
        assert_eq!(body.status, MatchStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_unknown_enum_value_is_a_validation_error() {
        let result = extract(r#"{"status":"done"}"#, Some("application/json")).await;
        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("done")));
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() {
        let result = extract("{}", Some("application/json")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_broken_syntax_and_content_type_are_bad_requests() {
        let result = extract(r#"{"status":"#, Some("application/json")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = extract(r#"{"status":"confirmed"}"#, None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
