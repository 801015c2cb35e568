//! Request body extractors.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};

use crate::domain::entities::LeadSubmission;
use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A lead submission posted either as JSON or as an urlencoded form.
///
/// The form encoding is chosen by `Content-Type`; anything else is parsed as
/// JSON, so a missing or wrong content type is rejected as an invalid body.
pub struct LeadPayload(pub LeadSubmission);

impl<S> FromRequest<S> for LeadPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with(FORM_CONTENT_TYPE));

        if is_form {
            let Form(submission) = Form::<LeadSubmission>::from_request(req, state).await?;
            Ok(Self(submission))
        } else {
            let Json(submission) = Json::<LeadSubmission>::from_request(req, state).await?;
            Ok(Self(submission))
        }
    }
}
