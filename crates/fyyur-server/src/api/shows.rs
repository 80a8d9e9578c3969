use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use super::{Flash, FormView, Outcome, Submission};
use crate::error::ApiError;
use fyyur_db::forms::ShowForm;
use fyyur_db::shows::{self, ShowListing};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct ShowsResponse {
    pub shows: Vec<ShowListing>,
}

/// GET /shows, newest first
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ShowsResponse>, ApiError> {
    Ok(Json(ShowsResponse {
        shows: shows::all(&state.db).await?,
    }))
}

/// GET /shows/create
pub async fn create_show_form() -> Json<FormView<ShowForm>> {
    Json(FormView {
        form: ShowForm::starting_at(chrono::Utc::now()),
        choices: None,
    })
}

/// POST /shows/create
pub async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    submission: Submission<ShowForm>,
) -> Outcome {
    let result = match submission {
        Submission::Decoded(form) => shows::insert(&state.db, form)
            .await
            .map_err(|e| e.to_string()),
        Submission::Undecodable { reason, .. } => Err(reason),
    };

    match result {
        Ok(_) => Outcome::Home(Flash::success("Show was successfully listed!")),
        Err(reason) => {
            tracing::error!(%reason, "failed to list show");
            Outcome::Home(Flash::error("An error occurred. Show could not be listed."))
        }
    }
}
