use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{artist, show, venue};
use crate::error::StoreError;
use crate::forms::ArtistForm;
use crate::genres;
use crate::shows::ShowTimeline;
use crate::DateTimeWithTimeZone;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistView {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<artist::Model> for ArtistView {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            genres: genres::split(&a.genres),
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            website_link: a.website_link,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

/// A show as seen from the artist's side: where they play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistShow {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: ArtistView,
    #[serde(flatten)]
    pub shows: ShowTimeline<ArtistShow>,
}

pub async fn all(db: &DatabaseConnection) -> Result<Vec<artist::Model>, StoreError> {
    Ok(artist::Entity::find()
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<artist::Model, StoreError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "artist",
            id,
        })
}

pub async fn search(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<artist::Model>, StoreError> {
    Ok(artist::Entity::find()
        .filter(crate::name_contains(artist::Column::Name, term))
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?)
}

pub async fn detail(
    db: &DatabaseConnection,
    id: i32,
    now: DateTimeWithTimeZone,
) -> Result<ArtistDetail, StoreError> {
    let artist_model = find(db, id).await?;

    let shows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(venue::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(s, v)| {
            let v = v?;
            let entry = ArtistShow {
                venue_id: v.id,
                venue_name: v.name,
                venue_image_link: v.image_link,
                start_time: s.start_time,
            };
            Some((s, entry))
        });

    Ok(ArtistDetail {
        artist: ArtistView::from(artist_model),
        shows: ShowTimeline::partition(shows, now),
    })
}

pub async fn insert(db: &DatabaseConnection, form: ArtistForm) -> Result<artist::Model, StoreError> {
    let active = form.into_active_model()?;

    let txn = db.begin().await?;
    let created = active.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(artist_id = created.id, name = %created.name, "artist listed");
    Ok(created)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    form: ArtistForm,
) -> Result<artist::Model, StoreError> {
    let mut active = form.into_active_model()?;

    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;
    active.id = ActiveValue::Unchanged(existing.id);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(artist_id = id, "artist updated");
    Ok(updated)
}

/// Delete an artist and all of their shows in one transaction.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<artist::Model, StoreError> {
    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;

    let removed = show::Entity::delete_many()
        .filter(show::Column::ArtistId.eq(id))
        .exec(&txn)
        .await?;
    artist::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        artist_id = id,
        shows_removed = removed.rows_affected,
        "artist deleted"
    );
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_view_from_model() {
        let model = artist::Model {
            id: 4,
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: Some("326-123-5000".into()),
            genres: "Rock n Roll".into(),
            image_link: None,
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            seeking_venue: true,
            website_link: Some("https://www.gunsnpetalsband.com".into()),
            seeking_description: Some("Looking for shows in the Bay Area".into()),
        };
        let view = ArtistView::from(model);
        assert_eq!(view.genres, vec!["Rock n Roll"]);
        assert_eq!(
            view.facebook_link.as_deref(),
            Some("https://www.facebook.com/GunsNPetals")
        );
        assert_eq!(
            view.website_link.as_deref(),
            Some("https://www.gunsnpetalsband.com")
        );
        assert!(view.seeking_venue);
    }

    #[test]
    fn test_artist_show_serialization() {
        let entry = ArtistShow {
            venue_id: 1,
            venue_name: "The Musical Hop".into(),
            venue_image_link: None,
            start_time: chrono::Utc::now().fixed_offset(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["venue_name"], "The Musical Hop");
        assert!(json["venue_image_link"].is_null());
        assert!(json["start_time"].is_string());
    }
}
