//! Genre lists are stored as a single comma-joined column and split back
//! into an ordered list on read.

use crate::error::StoreError;

const SEPARATOR: char = ',';

/// Genres offered by the listing forms.
pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// Join an already validated genre list into its stored form.
pub fn join(genres: &[String]) -> String {
    genres.join(&SEPARATOR.to_string())
}

/// Split a stored genre column back into its list form.
pub fn split(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored.split(SEPARATOR).map(str::to_string).collect()
}

/// Trim every entry and reject lists that could not survive a join/split
/// round trip: empty lists, blank entries, and entries containing the
/// separator.
pub fn normalize(genres: &[String]) -> Result<Vec<String>, StoreError> {
    if genres.is_empty() {
        return Err(StoreError::required("genres"));
    }

    genres
        .iter()
        .map(|g| {
            let g = g.trim();
            if g.is_empty() {
                Err(StoreError::Validation {
                    field: "genres",
                    reason: "genre names cannot be blank".to_string(),
                })
            } else if g.contains(SEPARATOR) {
                Err(StoreError::Validation {
                    field: "genres",
                    reason: format!("genre {g:?} cannot contain a comma"),
                })
            } else {
                Ok(g.to_string())
            }
        })
        .collect()
}
