pub mod artists;
pub mod shows;
pub mod venues;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use fyyur_db::forms::FormChoices;
use fyyur_db::DateTimeWithTimeZone;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::convert::Infallible;

use crate::error::ApiError;

pub(crate) fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().fixed_offset()
}

// ─── Flash messages ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
}

/// One-shot user-facing message attached to the page a request lands on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct RedirectView {
    pub location: String,
    pub flash: Flash,
}

/// Where a side-effecting request ends up: the home page rendered in
/// place, or a `303 See Other` to another page.
#[derive(Debug)]
pub enum Outcome {
    Home(Flash),
    Redirect { to: String, flash: Flash },
}

impl Outcome {
    pub fn redirect(to: impl Into<String>, flash: Flash) -> Self {
        Outcome::Redirect {
            to: to.into(),
            flash,
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Home(flash) => Json(HomeView { flash: Some(flash) }).into_response(),
            Outcome::Redirect { to, flash } => (
                StatusCode::SEE_OTHER,
                [(header::LOCATION, to.clone())],
                Json(RedirectView { location: to, flash }),
            )
                .into_response(),
        }
    }
}

// ─── Shared DTOs ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<T: Serialize> {
    pub count: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<T: Serialize> {
    pub search_term: String,
    pub results: SearchResults<T>,
}

impl<T: Serialize> SearchResponse<T> {
    pub fn new(search_term: String, data: Vec<T>) -> Self {
        Self {
            search_term,
            results: SearchResults {
                count: data.len(),
                data,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormView<F: Serialize> {
    pub form: F,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<FormChoices>,
}

/// JSON body extractor whose rejection is rendered as an error view.
pub struct JsonForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonForm<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonForm(value)),
            Err(rejection) => Err(ApiError::Unprocessable(rejection.body_text())),
        }
    }
}

/// Numeric `{id}` path segment. Anything that is not an `i32` names no
/// record, so it gets the not-found view.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub i32);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(PathId(id)),
            Err(rejection) => {
                tracing::debug!(%rejection, "unparseable id");
                Err(ApiError::NotFound("Page not found".to_string()))
            }
        }
    }
}

/// Body of a create or edit form. A body that cannot be decoded is still a
/// submission and gets the handler's failure outcome, so the extractor
/// never rejects.
#[derive(Debug)]
pub enum Submission<T> {
    Decoded(T),
    Undecodable {
        /// `name` field, when the body is a JSON object carrying one
        name: Option<String>,
        reason: String,
    },
}

impl<T> Submission<T>
where
    T: DeserializeOwned,
{
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<T>(body) {
            Ok(form) => Submission::Decoded(form),
            Err(e) => Submission::Undecodable {
                name: serde_json::from_slice::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v.get("name")?.as_str().map(str::to_string)),
                reason: e.to_string(),
            },
        }
    }
}

impl<S, T> FromRequest<S> for Submission<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(match Bytes::from_request(req, state).await {
            Ok(body) => Submission::from_slice(&body),
            Err(rejection) => Submission::Undecodable {
                name: None,
                reason: rejection.body_text(),
            },
        })
    }
}

// ─── Pages ──────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// GET /
pub async fn index() -> Json<HomeView> {
    Json(HomeView { flash: None })
}

/// GET /healthz
pub async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_serialization() {
        let json = serde_json::to_value(Flash::success("Show was successfully listed!")).unwrap();
        assert_eq!(json["category"], "success");
        assert_eq!(json["message"], "Show was successfully listed!");
        let json = serde_json::to_value(Flash::error("nope")).unwrap();
        assert_eq!(json["category"], "error");
    }

    #[test]
    fn test_home_outcome_is_ok() {
        let resp = Outcome::Home(Flash::success("done")).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_redirect_outcome_sets_location() {
        let resp = Outcome::redirect("/venues/3", Flash::success("done")).into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/venues/3");
    }

    #[test]
    fn test_search_request_defaults_to_empty_term() {
        let req: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.search_term, "");
    }

    #[test]
    fn test_search_response_counts() {
        let resp = SearchResponse::new("hop".into(), vec!["The Musical Hop", "Hop Inn"]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["search_term"], "hop");
        assert_eq!(json["results"]["count"], 2);
        assert_eq!(json["results"]["data"][1], "Hop Inn");
    }

    #[test]
    fn test_submission_decodes_form() {
        let sub = Submission::<fyyur_db::forms::ShowForm>::from_slice(br#"{"venue_id": 3}"#);
        assert!(matches!(sub, Submission::Decoded(form) if form.venue_id == Some(3)));
    }

    #[test]
    fn test_submission_keeps_name_of_mistyped_body() {
        let sub = Submission::<fyyur_db::forms::VenueForm>::from_slice(
            br#"{"name": "The Musical Hop", "genres": "Jazz"}"#,
        );
        match sub {
            Submission::Undecodable { name, .. } => {
                assert_eq!(name.as_deref(), Some("The Musical Hop"))
            }
            Submission::Decoded(_) => panic!("mistyped genres should not decode"),
        }
    }

    #[test]
    fn test_submission_of_garbage_has_no_name() {
        let sub = Submission::<fyyur_db::forms::ArtistForm>::from_slice(b"name=Guns");
        assert!(matches!(sub, Submission::Undecodable { name: None, .. }));
    }

    #[test]
    fn test_form_view_skips_missing_choices() {
        let view = FormView {
            form: "f",
            choices: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("choices").is_none());
    }
}
