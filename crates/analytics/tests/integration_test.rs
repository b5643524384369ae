//! Integration tests for the aggregation engine.
//!
//! These tests run the loader, joiner and all eleven aggregations together
//! on a small hand-written dataset.

use analytics::{BEST_RATED_MIN_RATINGS, ReportData};
use data_loader::normalize::normalize_users;
use data_loader::parser::{parse_movies_from_reader, parse_ratings_from_reader, parse_users_from_reader};
use data_loader::{Dataset, YearBasis};

const RATINGS: &str = "1::10::5::978300760\n2::10::3::978301000\n1::20::4::978302000\n";
const MOVIES: &str = "10::MovieA::Action|Comedy\n20::MovieB::Action\n";
const USERS: &str = "1::M::25::12::90210\n2::F::35::6::10001\n";

fn create_test_dataset() -> Dataset {
    let ratings = parse_ratings_from_reader(RATINGS.as_bytes(), "ratings", YearBasis::Utc).unwrap();
    let movies = parse_movies_from_reader(MOVIES.as_bytes(), "movies").unwrap();
    let users = normalize_users(parse_users_from_reader(USERS.as_bytes(), "users").unwrap()).unwrap();
    Dataset::new(ratings, movies, users)
}

#[test]
fn test_end_to_end_scenario() {
    let data = ReportData::from_dataset(&create_test_dataset());

    // Movies per genre
    assert_eq!(data.movies_per_genre.get("Action"), Some(2));
    assert_eq!(data.movies_per_genre.get("Comedy"), Some(1));
    assert_eq!(data.movies_per_genre.len(), 2);

    // Ratings by (value, gender)
    let table = &data.ratings_by_value_and_gender;
    assert_eq!(table.get("5", "M"), Some(1));
    assert_eq!(table.get("3", "F"), Some(1));
    assert_eq!(table.get("4", "M"), Some(1));
    assert_eq!(table.observed(), 3);

    // Co-occurrence
    let m = &data.genre_cooccurrence;
    assert_eq!(m.get("Action", "Comedy"), 1);
    assert_eq!(m.get("Comedy", "Action"), 1);
    assert_eq!(m.get("Action", "Action"), 0);
    assert_eq!(m.get("Comedy", "Comedy"), 0);

    assert_eq!(data.dropped_ratings, 0);
}

#[test]
fn test_user_compositions_use_labels() {
    let data = ReportData::from_dataset(&create_test_dataset());

    assert_eq!(data.users_by_age_and_gender.get("25-34", "M"), Some(1));
    assert_eq!(data.users_by_age_and_gender.get("35-44", "F"), Some(1));
    assert_eq!(
        data.users_by_occupation_and_age.get("programmer", "25-34"),
        Some(1)
    );
    assert_eq!(
        data.users_by_occupation_and_age.get("doctor/health care", "35-44"),
        Some(1)
    );
}

#[test]
fn test_rating_aggregations() {
    let data = ReportData::from_dataset(&create_test_dataset());

    assert_eq!(data.most_rated_movies.get("MovieA"), Some(2));
    assert_eq!(data.most_rated_movies.get("MovieB"), Some(1));

    // No movie in the sample reaches the threshold
    assert!(data.best_rated_movies.is_empty());
    assert_eq!(BEST_RATED_MIN_RATINGS, 500);

    assert_eq!(data.ratings_by_genre_and_gender.get("Action", "M"), Some(2));
    assert_eq!(data.ratings_by_genre_and_gender.get("Comedy", "F"), Some(1));
    assert_eq!(data.mean_rating_by_genre_and_gender.get("Action", "M"), Some(4.5));
    assert_eq!(data.active_users_by_year_and_gender.get("2000", "M"), Some(1));
    assert_eq!(data.active_users_by_year_and_gender.get("2000", "F"), Some(1));
    assert_eq!(data.mean_rating_by_year_and_genre.get("2000", "Action"), Some(4.0));
}

#[test]
fn test_dropped_ratings_are_counted() {
    let mut dataset = create_test_dataset();
    dataset.ratings.push(data_loader::Rating {
        user_id: 99,
        movie_id: 10,
        rating: 1,
        year: 2000,
    });

    let data = ReportData::from_dataset(&dataset);
    assert_eq!(data.dropped_ratings, 1);
    assert_eq!(data.most_rated_movies.get("MovieA"), Some(2));
}

#[test]
fn test_results_are_reproducible() {
    let first = ReportData::from_dataset(&create_test_dataset());
    let second = ReportData::from_dataset(&create_test_dataset());

    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}
