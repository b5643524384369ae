//! The eleven report aggregations.
//!
//! Each function borrows its input relation and returns a fresh result;
//! nothing here mutates or reorders the relations it reads.

use crate::group::group_by;
use crate::tables::{CellValue, CooccurrenceMatrix, CrossTab, LabeledSeries};
use crate::traits::{Count, Distinct, Mean};
use data_loader::{ExplodedRecord, Gender, JoinedRecord, Movie, User, UserId};
use std::collections::BTreeMap;

/// Number of movies shown in the top-N charts
pub const TOP_N: usize = 10;

/// A movie needs strictly more ratings than this to be ranked by average
pub const BEST_RATED_MIN_RATINGS: u64 = 500;

/// 1. Users by (age group, gender)
pub fn users_by_age_and_gender(users: &[User]) -> CrossTab<u64> {
    let grouped = group_by::<_, _, _, Count>(users, |u| (u.age_group.as_str(), u.gender), |_| ());
    CrossTab::from_grouped(&grouped)
}

/// 2. Users by (occupation, age group)
pub fn users_by_occupation_and_age(users: &[User]) -> CrossTab<u64> {
    let grouped = group_by::<_, _, _, Count>(
        users,
        |u| (u.occupation.as_str(), u.age_group.as_str()),
        |_| (),
    );
    CrossTab::from_grouped(&grouped)
}

/// 3. Movies per genre.
///
/// A movie with k genres adds one to each of k buckets, so the counts sum to
/// the number of (movie, genre) memberships. Every genre in `genres` is
/// present, with zero if no movie carries it.
pub fn movies_per_genre(movies: &[Movie], genres: &[String]) -> LabeledSeries<u64> {
    let mut counts: BTreeMap<&str, u64> = genres.iter().map(|g| (g.as_str(), 0)).collect();
    for movie in movies {
        for genre in &movie.genres {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }
    LabeledSeries::new(
        counts
            .into_iter()
            .map(|(g, n)| (g.to_string(), n))
            .collect(),
    )
}

/// 4. Pairwise genre co-occurrence.
///
/// Each pair of distinct genres on the same movie is counted once per movie,
/// keyed by the sorted pair, then materialized densely over `genres`.
pub fn genre_cooccurrence(movies: &[Movie], genres: &[String]) -> CooccurrenceMatrix {
    let mut pairs: BTreeMap<(String, String), u64> = BTreeMap::new();
    for movie in movies {
        for (i, a) in movie.genres.iter().enumerate() {
            for b in &movie.genres[i + 1..] {
                if a == b {
                    continue;
                }
                let key = if a < b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                *pairs.entry(key).or_insert(0) += 1;
            }
        }
    }
    CooccurrenceMatrix::from_pairs(genres, &pairs)
}

/// 5. Rating events by (rating value, gender)
pub fn ratings_by_value_and_gender(joined: &[JoinedRecord<'_>]) -> CrossTab<u64> {
    let grouped = group_by::<_, _, _, Count>(joined, |r| (r.rating, r.gender()), |_| ());
    CrossTab::from_grouped(&grouped)
}

/// Order by value descending; ties keep the incoming (name) order.
fn top_n<V: CellValue + PartialOrd>(grouped: BTreeMap<&str, V>, n: usize) -> LabeledSeries<V> {
    let mut entries: Vec<(String, V)> = grouped
        .into_iter()
        .map(|(name, v)| (name.to_string(), v))
        .collect();
    entries.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(n);
    LabeledSeries::new(entries)
}

fn ratings_per_movie<'a>(joined: &[JoinedRecord<'a>]) -> BTreeMap<&'a str, u64> {
    group_by::<_, _, _, Count>(joined, |r| r.name(), |_| ())
}

/// 6. The `n` movies with the most rating events
pub fn most_rated_movies(joined: &[JoinedRecord<'_>], n: usize) -> LabeledSeries<u64> {
    top_n(ratings_per_movie(joined), n)
}

/// 7. The `n` movies with the highest mean rating among movies with more
/// than `min_ratings` rating events
pub fn best_rated_movies(
    joined: &[JoinedRecord<'_>],
    min_ratings: u64,
    n: usize,
) -> LabeledSeries<f64> {
    let counts = ratings_per_movie(joined);
    let eligible = joined
        .iter()
        .filter(|r| counts.get(r.name()).is_some_and(|&c| c > min_ratings));
    let means = group_by::<_, _, _, Mean>(eligible, |r| r.name(), |r| f64::from(r.rating));
    top_n(means, n)
}

/// 8. Genre rows by (genre, gender)
pub fn ratings_by_genre_and_gender(exploded: &[ExplodedRecord<'_>]) -> CrossTab<u64> {
    let grouped = group_by::<_, _, _, Count>(exploded, |r| (r.genre, r.gender()), |_| ());
    CrossTab::from_grouped(&grouped)
}

/// 9. Mean rating by (genre, gender)
pub fn mean_rating_by_genre_and_gender(exploded: &[ExplodedRecord<'_>]) -> CrossTab<f64> {
    let grouped = group_by::<_, _, _, Mean>(
        exploded,
        |r| (r.genre, r.gender()),
        |r| f64::from(r.rating()),
    );
    CrossTab::from_grouped(&grouped)
}

/// 10. Distinct rating users by (year, gender)
pub fn active_users_by_year_and_gender(joined: &[JoinedRecord<'_>]) -> CrossTab<u64> {
    let grouped = group_by::<_, (i32, Gender), UserId, Distinct<UserId>>(
        joined,
        |r| (r.year, r.gender()),
        |r| r.user_id,
    );
    CrossTab::from_grouped(&grouped)
}

/// 11. Mean rating by (year, genre)
pub fn mean_rating_by_year_and_genre(exploded: &[ExplodedRecord<'_>]) -> CrossTab<f64> {
    let grouped = group_by::<_, _, _, Mean>(
        exploded,
        |r| (r.year(), r.genre),
        |r| f64::from(r.rating()),
    );
    CrossTab::from_grouped(&grouped)
}
