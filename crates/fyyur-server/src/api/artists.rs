use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use super::{
    now, Flash, FormView, JsonForm, Outcome, PathId, SearchRequest, SearchResponse, Submission,
};
use crate::error::ApiError;
use fyyur_db::artists::{self, ArtistDetail, ArtistView};
use fyyur_db::forms::{ArtistForm, FormChoices};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistsResponse {
    pub artists: Vec<ArtistView>,
}

#[derive(Debug, Serialize)]
pub struct EditArtistView {
    pub form: ArtistForm,
    pub artist: ArtistView,
    pub choices: FormChoices,
}

/// GET /artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ArtistsResponse>, ApiError> {
    let artists = artists::all(&state.db).await?;
    Ok(Json(ArtistsResponse {
        artists: artists.into_iter().map(ArtistView::from).collect(),
    }))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    JsonForm(body): JsonForm<SearchRequest>,
) -> Result<Json<SearchResponse<ArtistView>>, ApiError> {
    let found = artists::search(&state.db, &body.search_term).await?;
    Ok(Json(SearchResponse::new(
        body.search_term,
        found.into_iter().map(ArtistView::from).collect(),
    )))
}

/// GET /artists/:id
pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> Result<Json<ArtistDetail>, ApiError> {
    Ok(Json(artists::detail(&state.db, id, now()).await?))
}

/// GET /artists/:id/edit
pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
) -> Result<Json<EditArtistView>, ApiError> {
    let artist_model = artists::find(&state.db, id).await?;
    Ok(Json(EditArtistView {
        form: ArtistForm::from(artist_model.clone()),
        artist: ArtistView::from(artist_model),
        choices: FormChoices::default(),
    }))
}

/// POST /artists/:id/edit
pub async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId,
    submission: Submission<ArtistForm>,
) -> Result<Outcome, ApiError> {
    let form = match submission {
        Submission::Decoded(form) => form,
        Submission::Undecodable { name, reason } => {
            tracing::warn!(%reason, artist_id = id, "undecodable artist form");
            if let Err(e) = artists::find(&state.db, id).await {
                if e.is_not_found() {
                    return Err(e.into());
                }
            }
            return Err(update_failed(&name.unwrap_or_default()));
        }
    };

    let name = form.name.clone();
    match artists::update(&state.db, id, form).await {
        Ok(_) => Ok(Outcome::redirect(
            format!("/artists/{id}"),
            Flash::success(format!("Artist {name} was successfully updated!")),
        )),
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, artist_id = id, "failed to update artist");
            Err(update_failed(&name))
        }
    }
}

fn update_failed(name: &str) -> ApiError {
    ApiError::Internal(format!(
        "An error occurred. Artist {name} could not be updated."
    ))
}

/// GET /artists/create
pub async fn create_artist_form() -> Json<FormView<ArtistForm>> {
    Json(FormView {
        form: ArtistForm::default(),
        choices: Some(FormChoices::default()),
    })
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    submission: Submission<ArtistForm>,
) -> Outcome {
    let form = match submission {
        Submission::Decoded(form) => form,
        Submission::Undecodable { name, reason } => {
            let name = name.unwrap_or_default();
            tracing::warn!(%reason, artist = %name, "undecodable artist form");
            return listing_failed(&name);
        }
    };

    let name = form.name.clone();
    match artists::insert(&state.db, form).await {
        Ok(_) => Outcome::Home(Flash::success(format!(
            "Artist {name} was successfully listed!"
        ))),
        Err(e) => {
            tracing::error!(error = %e, artist = %name, "failed to list artist");
            listing_failed(&name)
        }
    }
}

fn listing_failed(name: &str) -> Outcome {
    Outcome::Home(Flash::error(format!(
        "An error occurred. Artist {name} could not be listed."
    )))
}
