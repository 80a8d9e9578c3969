use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use super::{
    now, Flash, FormView, JsonForm, Outcome, PathId, SearchRequest, SearchResponse, Submission,
};
use crate::error::ApiError;
use fyyur_db::forms::{FormChoices, VenueForm};
use fyyur_db::venues::{self, Area, VenueDetail, VenueView};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct AreasResponse {
    pub areas: Vec<Area>,
}

#[derive(Debug, Serialize)]
pub struct EditVenueView {
    pub form: VenueForm,
    pub venue: VenueView,
    pub choices: FormChoices,
}

/// GET /venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AreasResponse>, ApiError> {
    let areas = venues::areas(&state.db, now()).await?;
    Ok(Json(AreasResponse { areas }))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    JsonForm(body): JsonForm<SearchRequest>,
) -> Result<Json<SearchResponse<VenueView>>, ApiError> {
    let found = venues::search(&state.db, &body.search_term).await?;
    Ok(Json(SearchResponse::new(
        body.search_term,
        found.into_iter().map(VenueView::from).collect(),
    )))
}

/// GET /venues/:id
pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> Result<Json<VenueDetail>, ApiError> {
    Ok(Json(venues::detail(&state.db, id, now()).await?))
}

// ─── Create ─────────────────────────────────────────────────────────

/// GET /venues/create
pub async fn create_venue_form() -> Json<FormView<VenueForm>> {
    Json(FormView {
        form: VenueForm::default(),
        choices: Some(FormChoices::default()),
    })
}

/// POST /venues/create. Failures land on the home page with an error flash.
pub async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    submission: Submission<VenueForm>,
) -> Outcome {
    let form = match submission {
        Submission::Decoded(form) => form,
        Submission::Undecodable { name, reason } => {
            let name = name.unwrap_or_default();
            tracing::warn!(%reason, venue = %name, "undecodable venue form");
            return listing_failed(&name);
        }
    };

    let name = form.name.clone();
    match venues::insert(&state.db, form).await {
        Ok(_) => Outcome::Home(Flash::success(format!(
            "Venue {name} was successfully listed!"
        ))),
        Err(e) => {
            tracing::error!(error = %e, venue = %name, "failed to list venue");
            listing_failed(&name)
        }
    }
}

fn listing_failed(name: &str) -> Outcome {
    Outcome::Home(Flash::error(format!(
        "An error occurred. Venue {name} could not be listed."
    )))
}

// ─── Delete ─────────────────────────────────────────────────────────

/// DELETE /venues/:id
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> Result<Outcome, ApiError> {
    let name = match venues::find(&state.db, id).await {
        Ok(existing) => existing.name,
        Err(e) if e.is_not_found() => return Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, venue_id = id, "failed to load venue for deletion");
            return Ok(deletion_failed(id, &id.to_string()));
        }
    };

    match venues::delete(&state.db, id).await {
        Ok(_) => Ok(Outcome::redirect(
            "/",
            Flash::success(format!("Venue {name} has been deleted successfully.")),
        )),
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, venue_id = id, "failed to delete venue");
            Ok(deletion_failed(id, &name))
        }
    }
}

fn deletion_failed(id: i32, name: &str) -> Outcome {
    Outcome::redirect(
        format!("/venues/{id}"),
        Flash::error(format!("Error. Venue {name} has not been deleted.")),
    )
}

// ─── Edit ───────────────────────────────────────────────────────────

/// GET /venues/:id/edit
pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> Result<Json<EditVenueView>, ApiError> {
    let venue_model = venues::find(&state.db, id).await?;
    Ok(Json(EditVenueView {
        form: VenueForm::from(venue_model.clone()),
        venue: VenueView::from(venue_model),
        choices: FormChoices::default(),
    }))
}

/// POST /venues/:id/edit. Any failure other than an unknown id is fatal.
pub async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    submission: Submission<VenueForm>,
) -> Result<Outcome, ApiError> {
    let form = match submission {
        Submission::Decoded(form) => form,
        Submission::Undecodable { name, reason } => {
            tracing::warn!(%reason, venue_id = id, "undecodable venue form");
            if let Err(e) = venues::find(&state.db, id).await {
                if e.is_not_found() {
                    return Err(e.into());
                }
            }
            return Err(update_failed(&name.unwrap_or_default()));
        }
    };

    let name = form.name.clone();
    match venues::update(&state.db, id, form).await {
        Ok(_) => Ok(Outcome::redirect(
            format!("/venues/{id}"),
            Flash::success(format!("Venue {name} was successfully updated!")),
        )),
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, venue_id = id, "failed to update venue");
            Err(update_failed(&name))
        }
    }
}

fn update_failed(name: &str) -> ApiError {
    ApiError::Internal(format!(
        "An error occurred. Venue {name} could not be updated."
    ))
}
