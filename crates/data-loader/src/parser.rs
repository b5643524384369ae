//! Parser for MovieLens data files.
//!
//! - users.dat: userId::gender::age::occupation::zipcode
//! - movies.dat: movieId::title::genres
//! - ratings.dat: userId::movieId::rating::timestamp
//!
//! Each line maps positionally onto the fields of its record. There is no
//! quoting and no escaping; a line with the wrong number of fields aborts the
//! load.

use crate::error::{DataLoadError, Result};
use crate::normalize::split_genres;
use crate::types::*;
use chrono::{DateTime, Datelike, Local, TimeZone};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

const FIELD_DELIMITER: &str = "::";

const RATING_FIELDS: usize = 4;
const MOVIE_FIELDS: usize = 3;
const USER_FIELDS: usize = 5;

/// Calendar used to turn a rating timestamp into a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearBasis {
    /// The machine's local time zone
    #[default]
    Local,
    Utc,
}

impl YearBasis {
    /// Calendar year of a Unix timestamp (seconds), or `None` if it is out of
    /// chrono's range.
    pub fn year_of(self, timestamp: i64) -> Option<i32> {
        match self {
            YearBasis::Local => Local
                .timestamp_opt(timestamp, 0)
                .single()
                .map(|dt| dt.year()),
            YearBasis::Utc => DateTime::from_timestamp(timestamp, 0).map(|dt| dt.year()),
        }
    }
}

/// Read a whole source with ISO-8859-1 encoding (Latin-1)
///
/// The MovieLens dataset uses ISO-8859-1, not UTF-8. Every byte maps
/// directly to the Unicode code point of the same value.
fn read_latin1<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// Numbered, non-blank lines split on `::` with an exact field count.
fn records<'c>(
    content: &'c str,
    source: &'c str,
    expected: usize,
) -> impl Iterator<Item = Result<(usize, Vec<&'c str>)>> + 'c {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(move |(line_no, line)| {
            let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
            if fields.len() != expected {
                return Err(DataLoadError::FieldCountMismatch {
                    file: source.to_string(),
                    expected,
                    found: fields.len(),
                    line: line_no,
                });
            }
            Ok((line_no, fields))
        })
}

fn parse_field<T>(raw: &str, source: &str, line: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: source.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

fn parse_gender(s: &str) -> Result<Gender> {
    match s {
        "M" => Ok(Gender::Male),
        "F" => Ok(Gender::Female),
        _ => Err(DataLoadError::InvalidValue {
            field: "gender".to_string(),
            value: s.to_string(),
        }),
    }
}

// =============================================================================
// ratings.dat
// =============================================================================

/// Parse ratings from any reader. `source` names the input in error messages.
pub fn parse_ratings_from_reader<R: Read>(
    reader: R,
    source: &str,
    basis: YearBasis,
) -> Result<Vec<Rating>> {
    let content = read_latin1(reader)?;
    let mut ratings = Vec::new();

    for record in records(&content, source, RATING_FIELDS) {
        let (line_no, fields) = record?;

        let rating: u8 = parse_field(fields[2], source, line_no, "rating")?;
        if !(1..=5).contains(&rating) {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: rating.to_string(),
            });
        }

        let timestamp: i64 = parse_field(fields[3], source, line_no, "timestamp")?;
        let year = basis
            .year_of(timestamp)
            .ok_or_else(|| DataLoadError::ParseError {
                file: source.to_string(),
                line: line_no,
                reason: format!("Timestamp out of range: {}", timestamp),
            })?;

        ratings.push(Rating {
            user_id: parse_field(fields[0], source, line_no, "userId")?,
            movie_id: parse_field(fields[1], source, line_no, "movieId")?,
            rating,
            year,
        });
    }

    Ok(ratings)
}

/// Parse the ratings.dat file
pub fn parse_ratings(path: &Path, basis: YearBasis) -> Result<Vec<Rating>> {
    let file = open(path)?;
    parse_ratings_from_reader(file, &path.display().to_string(), basis)
}

// =============================================================================
// movies.dat
// =============================================================================

/// Parse movies from any reader.
///
/// Genres are pipe-separated: "Animation|Children's|Comedy"
pub fn parse_movies_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<Movie>> {
    let content = read_latin1(reader)?;
    let mut movies = Vec::new();

    for record in records(&content, source, MOVIE_FIELDS) {
        let (line_no, fields) = record?;
        movies.push(Movie {
            id: parse_field(fields[0], source, line_no, "movieId")?,
            name: fields[1].to_string(),
            genres: split_genres(fields[2]),
        });
    }

    Ok(movies)
}

/// Parse the movies.dat file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = open(path)?;
    parse_movies_from_reader(file, &path.display().to_string())
}

// =============================================================================
// users.dat
// =============================================================================

/// Parse users from any reader. Age and occupation stay as raw codes.
pub fn parse_users_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<RawUser>> {
    let content = read_latin1(reader)?;
    let mut users = Vec::new();

    for record in records(&content, source, USER_FIELDS) {
        let (line_no, fields) = record?;
        users.push(RawUser {
            id: parse_field(fields[0], source, line_no, "userId")?,
            gender: parse_gender(fields[1].trim())?,
            age_code: parse_field(fields[2], source, line_no, "age")?,
            occupation_code: parse_field(fields[3], source, line_no, "occupation")?,
            zipcode: fields[4].to_string(),
        });
    }

    Ok(users)
}

/// Parse the users.dat file
pub fn parse_users(path: &Path) -> Result<Vec<RawUser>> {
    let file = open(path)?;
    parse_users_from_reader(file, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratings() {
        let input = "1::1193::5::978300760\n1::661::3::978302109\n";
        let ratings = parse_ratings_from_reader(input.as_bytes(), "ratings", YearBasis::Utc).unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].user_id, 1);
        assert_eq!(ratings[0].movie_id, 1193);
        assert_eq!(ratings[0].rating, 5);
        assert_eq!(ratings[0].year, 2000);
        assert_eq!(ratings[1].movie_id, 661);
    }

    #[test]
    fn test_year_basis_utc() {
        // 2001-01-01T00:00:00Z
        assert_eq!(YearBasis::Utc.year_of(978307200), Some(2001));
        assert_eq!(YearBasis::Utc.year_of(978307199), Some(2000));
    }

    #[test]
    fn test_year_basis_local_mid_year() {
        // 2003-07-01T00:00:00Z is 2003 in every time zone
        assert_eq!(YearBasis::Local.year_of(1057017600), Some(2003));
    }

    #[test]
    fn test_wrong_field_count() {
        let input = "1::1193::5\n";
        let err = parse_ratings_from_reader(input.as_bytes(), "ratings", YearBasis::Utc).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::FieldCountMismatch { expected: 4, found: 3, line: 1, .. }
        ));
    }

    #[test]
    fn test_unparsable_number() {
        let input = "1::abc::5::978300760\n";
        let err = parse_ratings_from_reader(input.as_bytes(), "ratings", YearBasis::Utc).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_rating_out_of_range() {
        let input = "1::10::6::978300760\n";
        let err = parse_ratings_from_reader(input.as_bytes(), "ratings", YearBasis::Utc).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_parse_movies_splits_genres() {
        let input = "1::Toy Story (1995)::Animation|Children's|Comedy\n\n2::Jumanji (1995)::Adventure\n";
        let movies = parse_movies_from_reader(input.as_bytes(), "movies").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].name, "Toy Story (1995)");
        assert_eq!(movies[0].genres, vec!["Animation", "Children's", "Comedy"]);
        assert_eq!(movies[1].genres, vec!["Adventure"]);
    }

    #[test]
    fn test_parse_movies_latin1_title() {
        let mut input = b"73::Mis".to_vec();
        input.push(0xE9);
        input.extend_from_slice(b"rables, Les (1995)::Drama|Musical\n");
        let movies = parse_movies_from_reader(input.as_slice(), "movies").unwrap();
        assert_eq!(movies[0].name, "Misérables, Les (1995)");
    }

    #[test]
    fn test_parse_users_keeps_codes() {
        let input = "1::F::1::10::48067\r\n2::M::56::16::70072\r\n";
        let users = parse_users_from_reader(input.as_bytes(), "users").unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].gender, Gender::Female);
        assert_eq!(users[0].age_code, 1);
        assert_eq!(users[0].occupation_code, 10);
        assert_eq!(users[0].zipcode, "48067");
        assert_eq!(users[1].gender, Gender::Male);
    }

    #[test]
    fn test_invalid_gender() {
        let input = "1::X::1::10::48067\n";
        let err = parse_users_from_reader(input.as_bytes(), "users").unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("definitely/not/here/movies.dat")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
