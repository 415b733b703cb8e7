use jiff::Timestamp;
use serde::Serialize;

use crate::entities::{actor, director, genre, movie, review};

/// A movie to insert. `id` is left to the database unless set, which the
/// CSV import does to keep the source file's keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewMovie {
    pub id: Option<i32>,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    pub runtime_minutes: Option<i32>,
    pub rating: Option<f64>,
    pub votes: Option<i64>,
    pub revenue_millions: Option<f64>,
    pub metascore: Option<i32>,
}

impl NewMovie {
    pub fn new(title: impl Into<String>, release_year: i32) -> Self {
        Self { title: title.into(), release_year, ..Default::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub user_id: i32,
    pub movie_id: i32,
    pub review: String,
    /// Defaults to now.
    pub timestamp: Option<Timestamp>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: movie::Model,
    pub genres: Vec<genre::Model>,
    pub directors: Vec<director::Model>,
    pub actors: Vec<actor::Model>,
    pub reviews: Vec<review::Model>,
}

/// Lightweight projection used by listing pages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieSummary {
    pub movie_id: i32,
    pub title: String,
    pub release_year: i32,
    pub directors: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PopulateSummary {
    pub movies: usize,
    pub directors: usize,
    pub actors: usize,
    pub genres: usize,
    pub movie_directors: usize,
    pub movie_actors: usize,
    pub movie_genres: usize,
    pub users: usize,
    pub reviews: usize,
}
