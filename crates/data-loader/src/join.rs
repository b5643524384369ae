//! Joining the three relations into one denormalized view.
//!
//! The join is index-then-probe: hash indices are built over the two
//! dimension relations (movies, users) and each rating probes them in input
//! order, so the output order is the ratings' order.

use crate::types::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Result of an inner join.
#[derive(Debug)]
pub struct JoinOutcome<'a> {
    pub records: Vec<JoinedRecord<'a>>,
    /// Ratings whose movie or user did not resolve
    pub dropped: usize,
}

/// Inner-join ratings with movies (on movie id) and users (on user id).
///
/// Unresolved ratings are not an error; they are counted in
/// `JoinOutcome::dropped` and reported as a warning.
pub fn join<'a>(ratings: &[Rating], movies: &'a [Movie], users: &'a [User]) -> JoinOutcome<'a> {
    let movie_index: HashMap<MovieId, &'a Movie> = movies.iter().map(|m| (m.id, m)).collect();
    let user_index: HashMap<UserId, &'a User> = users.iter().map(|u| (u.id, u)).collect();

    let records: Vec<JoinedRecord<'a>> = ratings
        .iter()
        .filter_map(|r| {
            let movie = *movie_index.get(&r.movie_id)?;
            let user = *user_index.get(&r.user_id)?;
            Some(JoinedRecord {
                user_id: r.user_id,
                movie_id: r.movie_id,
                rating: r.rating,
                year: r.year,
                movie,
                user,
            })
        })
        .collect();

    let dropped = ratings.len() - records.len();
    if dropped > 0 {
        warn!(
            "Dropped {} of {} ratings with an unknown movie or user",
            dropped,
            ratings.len()
        );
    }
    info!("Joined {} rating events", records.len());

    JoinOutcome { records, dropped }
}

/// Flatten the genre list: one output row per (record, genre).
///
/// A record whose movie has no genres produces no rows.
pub fn explode<'a>(joined: &[JoinedRecord<'a>]) -> Vec<ExplodedRecord<'a>> {
    let exploded: Vec<ExplodedRecord<'a>> = joined
        .iter()
        .flat_map(|record| {
            record.genres().iter().map(move |genre| ExplodedRecord {
                record: *record,
                genre: genre.as_str(),
            })
        })
        .collect();

    info!("Exploded {} rating events into {} genre rows", joined.len(), exploded.len());
    exploded
}

/// Distinct genre tags across all movies, in sorted order.
pub fn genre_set(movies: &[Movie]) -> Vec<String> {
    movies
        .iter()
        .flat_map(|m| m.genres.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
