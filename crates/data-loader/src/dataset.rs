//! Loading the three relations into one in-memory `Dataset`.
//!
//! Stages run strictly in sequence: parse ratings, movies and users, then
//! normalize the user codes. All three files are fully read before anything
//! downstream starts.

use crate::error::Result;
use crate::join::{self, JoinOutcome};
use crate::normalize;
use crate::parser::{self, YearBasis};
use crate::types::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the three source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub ratings: PathBuf,
    pub movies: PathBuf,
    pub users: PathBuf,
}

impl DataPaths {
    /// The standard MovieLens 1M file names inside `data_dir`
    pub fn from_dir(data_dir: &Path) -> Self {
        Self {
            ratings: data_dir.join("ratings.dat"),
            movies: data_dir.join("movies.dat"),
            users: data_dir.join("users.dat"),
        }
    }
}

impl Default for DataPaths {
    /// `ratings.dat`, `movies.dat` and `users.dat` in the working directory
    fn default() -> Self {
        Self::from_dir(Path::new(""))
    }
}

/// The loaded, normalized source relations.
#[derive(Debug, Default)]
pub struct Dataset {
    pub ratings: Vec<Rating>,
    pub movies: Vec<Movie>,
    pub users: Vec<User>,
}

impl Dataset {
    pub fn new(ratings: Vec<Rating>, movies: Vec<Movie>, users: Vec<User>) -> Self {
        Self {
            ratings,
            movies,
            users,
        }
    }

    /// Load and normalize the whole dataset.
    ///
    /// Steps:
    /// 1. Parse ratings.dat (timestamps reduced to years)
    /// 2. Parse movies.dat (genres split)
    /// 3. Parse users.dat and resolve age/occupation codes to labels
    pub fn load_from_files(paths: &DataPaths, basis: YearBasis) -> Result<Self> {
        info!("Loading ratings from {}", paths.ratings.display());
        let ratings = parser::parse_ratings(&paths.ratings, basis)?;

        info!("Loading movies from {}", paths.movies.display());
        let movies = parser::parse_movies(&paths.movies)?;

        info!("Loading users from {}", paths.users.display());
        let users = normalize::normalize_users(parser::parse_users(&paths.users)?)?;

        let dataset = Self::new(ratings, movies, users);
        let (users, movies, ratings) = dataset.counts();
        info!("Loaded {} users, {} movies, {} ratings", users, movies, ratings);

        Ok(dataset)
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.movies.len(), self.ratings.len())
    }

    /// Distinct genres across all movies, sorted
    pub fn genre_set(&self) -> Vec<String> {
        join::genre_set(&self.movies)
    }

    /// Inner-join the ratings with their movies and users
    pub fn join(&self) -> JoinOutcome<'_> {
        join::join(&self.ratings, &self.movies, &self.users)
    }
}
