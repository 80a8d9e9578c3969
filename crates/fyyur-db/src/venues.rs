//! Venue data access and the venue-shaped views built on top of it.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;

use crate::entities::{artist, show, venue};
use crate::error::StoreError;
use crate::forms::VenueForm;
use crate::genres;
use crate::shows::ShowTimeline;
use crate::DateTimeWithTimeZone;

// ─── Views ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueView {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl From<venue::Model> for VenueView {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            genres: genres::split(&v.genres),
            name: v.name,
            address: v.address,
            city: v.city,
            state: v.state,
            phone: v.phone,
            website_link: v.website_link,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            image_link: v.image_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// A show as seen from the venue's side: who is playing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: VenueView,
    #[serde(flatten)]
    pub shows: ShowTimeline<VenueShow>,
}

// ─── Reads ──────────────────────────────────────────────────────────

pub async fn all(db: &DatabaseConnection) -> Result<Vec<venue::Model>, StoreError> {
    Ok(venue::Entity::find()
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<venue::Model, StoreError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound { entity: "venue", id })
}

/// Case-insensitive substring match on the venue name.
pub async fn search(db: &DatabaseConnection, term: &str) -> Result<Vec<venue::Model>, StoreError> {
    Ok(venue::Entity::find()
        .filter(crate::name_contains(venue::Column::Name, term))
        .order_by_asc(venue::Column::Name)
        .all(db)
        .await?)
}

/// All venues grouped by (city, state), each with its upcoming show count.
pub async fn areas(
    db: &DatabaseConnection,
    now: DateTimeWithTimeZone,
) -> Result<Vec<Area>, StoreError> {
    let venues = all(db).await?;

    let mut upcoming: HashMap<i32, usize> = HashMap::new();
    for s in show::Entity::find().all(db).await? {
        if s.is_upcoming(now) {
            *upcoming.entry(s.venue_id).or_default() += 1;
        }
    }

    Ok(group_by_area(venues, &upcoming))
}

/// Deduplicate (city, state) pairs through an ordered set, then file each
/// venue under its pair. Areas come out sorted by state, then city.
pub fn group_by_area(venues: Vec<venue::Model>, upcoming: &HashMap<i32, usize>) -> Vec<Area> {
    let pairs: BTreeSet<(String, String)> = venues
        .iter()
        .map(|v| (v.state.clone(), v.city.clone()))
        .collect();

    let mut areas: Vec<Area> = pairs
        .into_iter()
        .map(|(state, city)| Area {
            city,
            state,
            venues: Vec::new(),
        })
        .collect();

    for v in venues {
        if let Some(area) = areas
            .iter_mut()
            .find(|a| a.city == v.city && a.state == v.state)
        {
            area.venues.push(VenueSummary {
                id: v.id,
                num_upcoming_shows: upcoming.get(&v.id).copied().unwrap_or(0),
                name: v.name,
            });
        }
    }

    areas
}

/// Full venue view with its shows split into past and upcoming.
pub async fn detail(
    db: &DatabaseConnection,
    id: i32,
    now: DateTimeWithTimeZone,
) -> Result<VenueDetail, StoreError> {
    let venue_model = find(db, id).await?;

    let shows = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(artist::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(s, a)| {
            let a = a?;
            let entry = VenueShow {
                artist_id: a.id,
                artist_name: a.name,
                artist_image_link: a.image_link,
                start_time: s.start_time,
            };
            Some((s, entry))
        });

    Ok(VenueDetail {
        venue: VenueView::from(venue_model),
        shows: ShowTimeline::partition(shows, now),
    })
}

// ─── Writes ─────────────────────────────────────────────────────────

pub async fn insert(db: &DatabaseConnection, form: VenueForm) -> Result<venue::Model, StoreError> {
    let active = form.into_active_model()?;

    let txn = db.begin().await?;
    let created = active.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(venue_id = created.id, name = %created.name, "venue listed");
    Ok(created)
}

/// Replace every mutable field of an existing venue. Nothing is written
/// unless the whole form validates and the row exists.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    form: VenueForm,
) -> Result<venue::Model, StoreError> {
    let mut active = form.into_active_model()?;

    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;
    active.id = ActiveValue::Unchanged(existing.id);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(venue_id = id, "venue updated");
    Ok(updated)
}

/// Delete a venue together with every show booked there. Returns the
/// removed venue.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<venue::Model, StoreError> {
    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;

    let removed = show::Entity::delete_many()
        .filter(show::Column::VenueId.eq(id))
        .exec(&txn)
        .await?;
    venue::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        venue_id = id,
        shows_removed = removed.rows_affected,
        "venue deleted"
    );
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_venue(id: i32, name: &str, city: &str, state: &str) -> venue::Model {
        venue::Model {
            id,
            name: name.into(),
            city: city.into(),
            state: state.into(),
            address: "1 Main Street".into(),
            genres: "Jazz,Folk".into(),
            phone: None,
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_talent: false,
            seeking_description: None,
        }
    }

    #[test]
    fn test_venue_view_splits_genres() {
        let view = VenueView::from(make_venue(1, "The Musical Hop", "San Francisco", "CA"));
        assert_eq!(view.genres, vec!["Jazz", "Folk"]);
        assert_eq!(view.name, "The Musical Hop");
    }

    #[test]
    fn test_group_by_area_shares_pairs() {
        let venues = vec![
            make_venue(1, "Knitting Factory", "Boise", "ID"),
            make_venue(2, "Neurolux", "Boise", "ID"),
            make_venue(3, "Park Square Live", "San Francisco", "CA"),
        ];
        let areas = group_by_area(venues, &HashMap::new());

        assert_eq!(areas.len(), 2);
        let boise = areas.iter().find(|a| a.city == "Boise").unwrap();
        assert_eq!(boise.state, "ID");
        assert_eq!(boise.venues.len(), 2);
        let sf = areas.iter().find(|a| a.city == "San Francisco").unwrap();
        assert_eq!(sf.venues.len(), 1);
        assert_eq!(sf.venues[0].name, "Park Square Live");
    }

    #[test]
    fn test_group_by_area_same_city_different_state() {
        let venues = vec![
            make_venue(1, "A", "Portland", "OR"),
            make_venue(2, "B", "Portland", "ME"),
        ];
        let areas = group_by_area(venues, &HashMap::new());
        assert_eq!(areas.len(), 2);
        assert!(areas.iter().all(|a| a.venues.len() == 1));
    }

    #[test]
    fn test_group_by_area_counts_upcoming() {
        let venues = vec![
            make_venue(1, "A", "Boise", "ID"),
            make_venue(2, "B", "Boise", "ID"),
        ];
        let upcoming = HashMap::from([(2, 3)]);
        let areas = group_by_area(venues, &upcoming);
        let counts: Vec<usize> = areas[0].venues.iter().map(|v| v.num_upcoming_shows).collect();
        assert_eq!(counts, vec![0, 3]);
    }

    #[test]
    fn test_group_by_area_empty() {
        assert!(group_by_area(Vec::new(), &HashMap::new()).is_empty());
    }

    #[test]
    fn test_area_serialization() {
        let areas = group_by_area(
            vec![make_venue(4, "Neurolux", "Boise", "ID")],
            &HashMap::new(),
        );
        let json = serde_json::to_value(&areas).unwrap();
        assert_eq!(json[0]["city"], "Boise");
        assert_eq!(json[0]["venues"][0]["id"], 4);
        assert_eq!(json[0]["venues"][0]["num_upcoming_shows"], 0);
    }
}
