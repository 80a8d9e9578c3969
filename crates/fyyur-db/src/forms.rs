//! Submitted listing forms and their required-field validation.
//!
//! Every form is checked field by field before any transaction is opened;
//! the first problem found is reported as [`StoreError::Validation`].

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{artist, show, venue};
use crate::error::StoreError;
use crate::genres;

/// Format used for naive show start times, e.g. `2035-05-21 21:30:00`.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Options offered next to venue and artist forms. Advisory only.
#[derive(Debug, Clone, Serialize)]
pub struct FormChoices {
    pub genres: &'static [&'static str],
    pub states: &'static [&'static str],
}

impl Default for FormChoices {
    fn default() -> Self {
        Self {
            genres: genres::GENRE_CHOICES,
            states: STATE_CHOICES,
        }
    }
}

// ─── Venue ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    /// Validate the form and turn it into an insertable row. The id is left
    /// unset; callers updating an existing row set it themselves.
    pub fn into_active_model(self) -> Result<venue::ActiveModel, StoreError> {
        let name = required("name", self.name)?;
        let city = required("city", self.city)?;
        let state = required("state", self.state)?;
        let address = required("address", self.address)?;
        let genres = genres::normalize(&self.genres)?;

        Ok(venue::ActiveModel {
            id: NotSet,
            name: Set(name),
            city: Set(city),
            state: Set(state),
            address: Set(address),
            genres: Set(genres::join(&genres)),
            phone: Set(optional(self.phone)),
            image_link: Set(link("image_link", self.image_link)?),
            facebook_link: Set(link("facebook_link", self.facebook_link)?),
            website_link: Set(link("website_link", self.website_link)?),
            seeking_talent: Set(self.seeking_talent),
            seeking_description: Set(seeking_description(
                self.seeking_talent,
                self.seeking_description,
            )),
        })
    }
}

impl From<venue::Model> for VenueForm {
    fn from(v: venue::Model) -> Self {
        Self {
            genres: genres::split(&v.genres),
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            image_link: v.image_link,
            facebook_link: v.facebook_link,
            website_link: v.website_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
        }
    }
}

// ─── Artist ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn into_active_model(self) -> Result<artist::ActiveModel, StoreError> {
        let name = required("name", self.name)?;
        let city = required("city", self.city)?;
        let state = required("state", self.state)?;
        let genres = genres::normalize(&self.genres)?;

        Ok(artist::ActiveModel {
            id: NotSet,
            name: Set(name),
            city: Set(city),
            state: Set(state),
            phone: Set(optional(self.phone)),
            genres: Set(genres::join(&genres)),
            image_link: Set(link("image_link", self.image_link)?),
            facebook_link: Set(link("facebook_link", self.facebook_link)?),
            seeking_venue: Set(self.seeking_venue),
            website_link: Set(link("website_link", self.website_link)?),
            seeking_description: Set(seeking_description(
                self.seeking_venue,
                self.seeking_description,
            )),
        })
    }
}

impl From<artist::Model> for ArtistForm {
    fn from(a: artist::Model) -> Self {
        Self {
            genres: genres::split(&a.genres),
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            facebook_link: a.facebook_link,
            website_link: a.website_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

// ─── Show ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: Option<i32>,
    pub venue_id: Option<i32>,
    /// RFC 3339, or naive `YYYY-MM-DD HH:MM:SS` read as UTC
    pub start_time: Option<String>,
}

impl ShowForm {
    /// Blank form with the start time preset to `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            artist_id: None,
            venue_id: None,
            start_time: Some(now.format(START_TIME_FORMAT).to_string()),
        }
    }

    pub fn into_active_model(self) -> Result<show::ActiveModel, StoreError> {
        let artist_id = self.artist_id.ok_or(StoreError::required("artist_id"))?;
        let venue_id = self.venue_id.ok_or(StoreError::required("venue_id"))?;
        let raw = self
            .start_time
            .filter(|s| !s.trim().is_empty())
            .ok_or(StoreError::required("start_time"))?;
        let start_time = parse_start_time(&raw).ok_or_else(|| StoreError::Validation {
            field: "start_time",
            reason: format!("{raw:?} is not a valid date and time"),
        })?;

        Ok(show::ActiveModel {
            id: NotSet,
            artist_id: Set(artist_id),
            venue_id: Set(venue_id),
            start_time: Set(start_time),
        })
    }
}

/// Parse a submitted start time and normalize it to a UTC offset.
pub fn parse_start_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT).map(|n| n.and_utc()))
        .ok()
        .map(|t| t.fixed_offset())
}

// ─── Field helpers ──────────────────────────────────────────────────

fn required(field: &'static str, value: String) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::required(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn link(field: &'static str, value: Option<String>) -> Result<Option<String>, StoreError> {
    match optional(value) {
        None => Ok(None),
        Some(v) => {
            let v = v.trim().to_string();
            url::Url::parse(&v).map_err(|e| StoreError::Validation {
                field,
                reason: format!("not a valid URL: {e}"),
            })?;
            Ok(Some(v))
        }
    }
}

/// The description only carries meaning while the seeking flag is on.
fn seeking_description(seeking: bool, description: Option<String>) -> Option<String> {
    if seeking {
        optional(description)
    } else {
        None
    }
}
