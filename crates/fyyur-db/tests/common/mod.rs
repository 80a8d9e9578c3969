// Shared test utilities for persistence tests
#![allow(dead_code)]

use fyyur_db::forms::{ArtistForm, ShowForm, VenueForm};
use fyyur_db::sea_orm::DatabaseConnection;
use fyyur_db::{connect, DatabaseConfig};
use fyyur_migration::{Migrator, MigratorTrait};

pub const PAST: &str = "2019-05-21 21:30:00";
pub const FUTURE: &str = "2099-04-01 20:00:00";

/// Fresh in-memory database with the full schema applied
pub async fn test_db() -> DatabaseConnection {
    let db = connect(&DatabaseConfig::in_memory())
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    db
}

pub fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
    VenueForm {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        address: "1015 Folsom Street".into(),
        genres: vec!["Jazz".into(), "Reggae".into(), "Swing".into()],
        ..Default::default()
    }
}

pub fn artist_form(name: &str) -> ArtistForm {
    ArtistForm {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        genres: vec!["Rock n Roll".into()],
        image_link: Some("https://images.example.com/artist.jpg".into()),
        ..Default::default()
    }
}

pub fn show_form(artist_id: i32, venue_id: i32, start_time: &str) -> ShowForm {
    ShowForm {
        artist_id: Some(artist_id),
        venue_id: Some(venue_id),
        start_time: Some(start_time.into()),
    }
}
