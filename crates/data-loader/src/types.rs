//! Core domain types for the MovieLens dataset.
//!
//! The three source relations (`Rating`, `Movie`, `User`) own their data.
//! The derived relations (`JoinedRecord`, `ExplodedRecord`) borrow the
//! movie and user rows they were joined against, so a million-row join does
//! not copy every title and label string.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user (1-6040 in MovieLens 1M)
pub type UserId = u32;

/// Unique identifier for a movie (varies in MovieLens 1M)
pub type MovieId = u32;

// =============================================================================
// User-related Types
// =============================================================================

/// Gender as recorded in users.dat.
///
/// `Female` sorts before `Male` so grouped results list "F" first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Gender {
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

impl Gender {
    /// The one-letter code used in the source file and in chart legends
    pub fn code(self) -> &'static str {
        match self {
            Gender::Female => "F",
            Gender::Male => "M",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A users.dat row as loaded, before the categorical codes are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUser {
    pub id: UserId,
    pub gender: Gender,
    pub age_code: u8,
    pub occupation_code: u8,
    pub zipcode: String,
}

/// A user after normalization: age bracket and occupation are display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub gender: Gender,
    pub age_group: String,
    pub occupation: String,
    pub zipcode: String,
}

// =============================================================================
// Movie-related Types
// =============================================================================

/// Represents a movie in the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    /// Full title as it appears in movies.dat, e.g. "Toy Story (1995)"
    pub name: String,
    /// Genre tags in source order
    pub genres: Vec<String>,
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating event.
///
/// The source timestamp is reduced to a calendar year at load time; finer
/// precision is never needed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value from 1 to 5
    pub rating: u8,
    pub year: i32,
}

// =============================================================================
// Derived Relations
// =============================================================================

/// One rating event joined with its movie and its user.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JoinedRecord<'a> {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: u8,
    pub year: i32,
    pub movie: &'a Movie,
    pub user: &'a User,
}

impl<'a> JoinedRecord<'a> {
    pub fn name(&self) -> &'a str {
        &self.movie.name
    }

    pub fn genres(&self) -> &'a [String] {
        &self.movie.genres
    }

    pub fn gender(&self) -> Gender {
        self.user.gender
    }
}

/// A `JoinedRecord` paired with exactly one of its movie's genres.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplodedRecord<'a> {
    pub record: JoinedRecord<'a>,
    pub genre: &'a str,
}

impl ExplodedRecord<'_> {
    pub fn rating(&self) -> u8 {
        self.record.rating
    }

    pub fn year(&self) -> i32 {
        self.record.year
    }

    pub fn gender(&self) -> Gender {
        self.record.gender()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_orders_female_first() {
        assert!(Gender::Female < Gender::Male);
        assert_eq!(Gender::Male.to_string(), "M");
    }

    #[test]
    fn test_joined_record_serializes_with_gender_code() {
        let movie = Movie {
            id: 10,
            name: "MovieA".to_string(),
            genres: vec!["Action".to_string()],
        };
        let user = User {
            id: 2,
            gender: Gender::Female,
            age_group: "35-44".to_string(),
            occupation: "doctor/health care".to_string(),
            zipcode: "10001".to_string(),
        };
        let record = JoinedRecord {
            user_id: 2,
            movie_id: 10,
            rating: 3,
            year: 2000,
            movie: &movie,
            user: &user,
        };

        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["user"]["gender"], "F");
        assert_eq!(json["movie"]["name"], "MovieA");
        assert_eq!(record.gender(), Gender::Female);
        assert_eq!(record.name(), "MovieA");
    }
}
