//! All eleven aggregation results, computed together in report order.

use crate::aggregations::*;
use crate::tables::{CooccurrenceMatrix, CrossTab, LabeledSeries};
use data_loader::{Dataset, ExplodedRecord, JoinedRecord, Movie, User, explode};
use serde::Serialize;
use tracing::info;

/// The numeric content of the report, one field per chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    pub users_by_age_and_gender: CrossTab<u64>,
    pub users_by_occupation_and_age: CrossTab<u64>,
    pub movies_per_genre: LabeledSeries<u64>,
    pub genre_cooccurrence: CooccurrenceMatrix,
    pub ratings_by_value_and_gender: CrossTab<u64>,
    pub most_rated_movies: LabeledSeries<u64>,
    pub best_rated_movies: LabeledSeries<f64>,
    pub ratings_by_genre_and_gender: CrossTab<u64>,
    pub mean_rating_by_genre_and_gender: CrossTab<f64>,
    pub active_users_by_year_and_gender: CrossTab<u64>,
    pub mean_rating_by_year_and_genre: CrossTab<f64>,
    /// Ratings lost in the join because their movie or user was unknown
    pub dropped_ratings: usize,
}

impl ReportData {
    /// Compute every aggregation from already-joined relations.
    pub fn compute(
        users: &[User],
        movies: &[Movie],
        genres: &[String],
        joined: &[JoinedRecord<'_>],
        exploded: &[ExplodedRecord<'_>],
    ) -> Self {
        Self {
            users_by_age_and_gender: users_by_age_and_gender(users),
            users_by_occupation_and_age: users_by_occupation_and_age(users),
            movies_per_genre: movies_per_genre(movies, genres),
            genre_cooccurrence: genre_cooccurrence(movies, genres),
            ratings_by_value_and_gender: ratings_by_value_and_gender(joined),
            most_rated_movies: most_rated_movies(joined, TOP_N),
            best_rated_movies: best_rated_movies(joined, BEST_RATED_MIN_RATINGS, TOP_N),
            ratings_by_genre_and_gender: ratings_by_genre_and_gender(exploded),
            mean_rating_by_genre_and_gender: mean_rating_by_genre_and_gender(exploded),
            active_users_by_year_and_gender: active_users_by_year_and_gender(joined),
            mean_rating_by_year_and_genre: mean_rating_by_year_and_genre(exploded),
            dropped_ratings: 0,
        }
    }

    /// Join, explode and aggregate a loaded dataset.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let genres = dataset.genre_set();
        let joined = dataset.join();
        let exploded = explode(&joined.records);

        let mut data = Self::compute(
            &dataset.users,
            &dataset.movies,
            &genres,
            &joined.records,
            &exploded,
        );
        data.dropped_ratings = joined.dropped;

        info!(
            "Computed aggregations over {} genres, {} joined and {} exploded rows",
            genres.len(),
            joined.records.len(),
            exploded.len()
        );
        data
    }

    /// Pretty JSON of every result, for diffing runs
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dataset() {
        let data = ReportData::from_dataset(&Dataset::default());

        assert!(data.users_by_age_and_gender.is_empty());
        assert!(data.movies_per_genre.is_empty());
        assert!(data.genre_cooccurrence.is_empty());
        assert!(data.most_rated_movies.is_empty());
        assert_eq!(data.dropped_ratings, 0);
    }
}
