//! Show data access, the global listing, and the past/upcoming split used
//! by venue and artist detail views.

use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{artist, show, venue};
use crate::error::StoreError;
use crate::forms::ShowForm;
use crate::DateTimeWithTimeZone;

/// One row of the global show listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

/// Shows of one venue or artist, split around a reference instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowTimeline<T> {
    pub past_shows: Vec<T>,
    pub upcoming_shows: Vec<T>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl<T> ShowTimeline<T> {
    /// Shows starting strictly after `now` are upcoming; everything else,
    /// including a show starting exactly at `now`, is past. Input order is
    /// kept within each side.
    pub fn partition<I>(shows: I, now: DateTimeWithTimeZone) -> Self
    where
        I: IntoIterator<Item = (show::Model, T)>,
    {
        let (upcoming, past): (Vec<_>, Vec<_>) =
            shows.into_iter().partition(|(s, _)| s.is_upcoming(now));

        let past_shows: Vec<T> = past.into_iter().map(|(_, entry)| entry).collect();
        let upcoming_shows: Vec<T> = upcoming.into_iter().map(|(_, entry)| entry).collect();

        Self {
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

/// Every show, newest first, with venue and artist names joined in.
pub async fn all(db: &DatabaseConnection) -> Result<Vec<ShowListing>, StoreError> {
    let shows = show::Entity::find()
        .order_by_desc(show::Column::StartTime)
        .order_by_desc(show::Column::Id)
        .all(db)
        .await?;

    // Batch-fetch venues and artists
    let venue_ids: Vec<i32> = shows
        .iter()
        .map(|s| s.venue_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let artist_ids: Vec<i32> = shows
        .iter()
        .map(|s| s.artist_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let venues: HashMap<i32, venue::Model> = if venue_ids.is_empty() {
        HashMap::new()
    } else {
        venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect()
    };

    let artists: HashMap<i32, artist::Model> = if artist_ids.is_empty() {
        HashMap::new()
    } else {
        artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect()
    };

    Ok(shows
        .into_iter()
        .filter_map(|s| {
            let v = venues.get(&s.venue_id)?;
            let a = artists.get(&s.artist_id)?;
            Some(ShowListing {
                venue_id: v.id,
                venue_name: v.name.clone(),
                artist_id: a.id,
                artist_name: a.name.clone(),
                artist_image_link: a.image_link.clone(),
                start_time: s.start_time,
            })
        })
        .collect())
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<show::Model, StoreError> {
    show::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "show", id })
}

/// Book an artist at a venue. Both ends must exist when the row is
/// written; the check runs in the same transaction as the insert.
pub async fn insert(db: &DatabaseConnection, form: ShowForm) -> Result<show::Model, StoreError> {
    let active = form.into_active_model()?;
    let artist_id = *active.artist_id.as_ref();
    let venue_id = *active.venue_id.as_ref();

    let txn = db.begin().await?;
    if artist::Entity::find_by_id(artist_id).one(&txn).await?.is_none() {
        return Err(StoreError::MissingReference {
            entity: "artist",
            id: artist_id,
        });
    }
    if venue::Entity::find_by_id(venue_id).one(&txn).await?.is_none() {
        return Err(StoreError::MissingReference {
            entity: "venue",
            id: venue_id,
        });
    }
    let created = active.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        show_id = created.id,
        artist_id,
        venue_id,
        start_time = %created.start_time,
        "show listed"
    );
    Ok(created)
}
