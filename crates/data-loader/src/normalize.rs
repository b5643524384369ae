//! Categorical normalization.
//!
//! users.dat stores age bracket and occupation as integer codes. The tables
//! below are the only source of display labels; a code missing from its
//! table means the input is corrupt and loading stops.

use crate::error::{DataLoadError, Result};
use crate::types::{RawUser, User};

/// Age bracket code → label
pub const AGE_LABELS: [(u8, &str); 7] = [
    (1, "18 below"),
    (18, "18-24"),
    (25, "25-34"),
    (35, "35-44"),
    (45, "45-49"),
    (50, "50-55"),
    (56, "56+"),
];

/// Occupation code → label
pub const OCCUPATION_LABELS: [(u8, &str); 21] = [
    (0, "other/not specified"),
    (1, "academic/educator"),
    (2, "artist"),
    (3, "clerical/admin"),
    (4, "college/grad student"),
    (5, "customer service"),
    (6, "doctor/health care"),
    (7, "executive/managerial"),
    (8, "farmer"),
    (9, "homemaker"),
    (10, "K-12 student"),
    (11, "lawyer"),
    (12, "programmer"),
    (13, "retired"),
    (14, "sales/marketing"),
    (15, "scientist"),
    (16, "self-employed"),
    (17, "technician/engineer"),
    (18, "tradesman/craftsman"),
    (19, "unemployed"),
    (20, "writer"),
];

fn lookup(table: &[(u8, &'static str)], field: &'static str, code: u8) -> Result<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .ok_or(DataLoadError::UnknownCode { field, code })
}

/// Label for an age bracket code, e.g. `25` -> `"25-34"`
pub fn age_label(code: u8) -> Result<&'static str> {
    lookup(&AGE_LABELS, "age", code)
}

/// Label for an occupation code, e.g. `12` -> `"programmer"`
pub fn occupation_label(code: u8) -> Result<&'static str> {
    lookup(&OCCUPATION_LABELS, "occupation", code)
}

/// Replace the coded fields of a user with their labels.
pub fn normalize_user(raw: RawUser) -> Result<User> {
    Ok(User {
        id: raw.id,
        gender: raw.gender,
        age_group: age_label(raw.age_code)?.to_string(),
        occupation: occupation_label(raw.occupation_code)?.to_string(),
        zipcode: raw.zipcode,
    })
}

/// Normalize every user, stopping at the first unmapped code.
pub fn normalize_users(raw: Vec<RawUser>) -> Result<Vec<User>> {
    raw.into_iter().map(normalize_user).collect()
}

/// Split a pipe-joined genre field into trimmed tags.
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
///
/// Empty tags are kept as they are.
pub fn split_genres(s: &str) -> Vec<String> {
    s.split('|').map(|g| g.trim().to_string()).collect()
}
