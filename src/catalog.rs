//! In-memory normalization of the CSV inputs.
//!
//! The movie file carries directors, actors and genres as free text. Building
//! a [`Catalog`] folds those into one dictionary per kind keyed by name, hands
//! out surrogate keys in order of first appearance and remembers which movies
//! each name appeared on, so the junction rows can be emitted afterwards.

use std::{collections::HashMap, io};

use csv::{ReaderBuilder, StringRecord, Trim};
use jiff::{Timestamp, civil, tz::TimeZone};
use thiserror::Error;

use crate::{error::AppResult, models::NewMovie};

pub const MOVIES_FILE: &str = "Data1000Movies.csv";
pub const USERS_FILE: &str = "users.csv";
pub const REVIEWS_FILE: &str = "reviews.csv";

// Data1000Movies.csv column positions.
const RANK: usize = 0;
const TITLE: usize = 1;
const GENRE: usize = 2;
const DESCRIPTION: usize = 3;
const DIRECTOR: usize = 4;
const ACTORS: usize = 5;
const YEAR: usize = 6;
const RUNTIME: usize = 7;
const RATING: usize = 8;
const VOTES: usize = 9;
const REVENUE: usize = 10;
const METASCORE: usize = 11;

#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    #[error("line {line}: missing field `{field}`")]
    MissingField { line: u64, field: &'static str },
    #[error("line {line}: invalid {field} `{value}`")]
    InvalidField { line: u64, field: &'static str, value: String },
    #[error("line {line}: duplicate movie key {key}")]
    DuplicateMovie { line: u64, key: i32 },
}

/// Distinct names of one kind (directors, actors or genres) in order of first
/// appearance, each with the movie keys it was seen on.
#[derive(Debug, Default)]
pub struct NameIndex {
    entries: Vec<(String, Vec<i32>)>,
    by_name: HashMap<String, usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameRecord<'a> {
    pub id: i32,
    pub name: &'a str,
}

/// One junction-table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: i32,
    pub movie_id: i32,
    pub target_id: i32,
}

impl NameIndex {
    fn insert(&mut self, name: &str, movie_id: i32) {
        match self.by_name.get(name) {
            Some(&slot) => {
                let movies = &mut self.entries[slot].1;
                if movies.last() != Some(&movie_id) {
                    movies.push(movie_id);
                }
            },
            None => {
                self.by_name.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), vec![movie_id]));
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Surrogate key assigned to `name`, if it was seen.
    pub fn key_of(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).map(|&slot| slot as i32 + 1)
    }

    pub fn movies_of(&self, name: &str) -> &[i32] {
        self.by_name.get(name).map(|&slot| self.entries[slot].1.as_slice()).unwrap_or(&[])
    }

    pub fn records(&self) -> impl Iterator<Item = NameRecord<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(slot, (name, _))| NameRecord { id: slot as i32 + 1, name })
    }

    /// Junction rows grouped by name, numbered from 1.
    pub fn links(&self) -> impl Iterator<Item = LinkRecord> + '_ {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(slot, (_, movies))| {
                movies.iter().map(move |&movie_id| (slot as i32 + 1, movie_id))
            })
            .enumerate()
            .map(|(n, (target_id, movie_id))| LinkRecord { id: n as i32 + 1, movie_id, target_id })
    }

    pub fn link_count(&self) -> usize {
        self.entries.iter().map(|(_, movies)| movies.len()).sum()
    }
}

#[derive(Debug, Default)]
pub struct Catalog {
    pub movies: Vec<NewMovie>,
    pub directors: NameIndex,
    pub actors: NameIndex,
    pub genres: NameIndex,
}

impl Catalog {
    pub fn from_reader<R: io::Read>(reader: R) -> AppResult<Self> {
        let mut catalog = Catalog::default();
        let mut seen = HashMap::new();

        for record in csv_reader(reader).records() {
            let record = record?;
            let line = line_of(&record);

            let id: i32 = parse_required(&record, RANK, "rank")?;
            if seen.insert(id, line).is_some() {
                return Err(ImportError::DuplicateMovie { line, key: id }.into());
            }

            let movie = NewMovie {
                id: Some(id),
                title: field(&record, TITLE, "title")?.to_string(),
                release_year: parse_required(&record, YEAR, "year")?,
                description: field(&record, DESCRIPTION, "description")?.to_string(),
                runtime_minutes: parse_optional(&record, RUNTIME, "runtime")?,
                rating: parse_optional(&record, RATING, "rating")?,
                votes: parse_optional(&record, VOTES, "votes")?,
                revenue_millions: parse_optional(&record, REVENUE, "revenue")?,
                metascore: parse_optional(&record, METASCORE, "metascore")?,
            };

            let director = field(&record, DIRECTOR, "director")?;
            if !director.is_empty() {
                catalog.directors.insert(director, id);
            }
            for actor in split_list(field(&record, ACTORS, "actors")?) {
                catalog.actors.insert(actor, id);
            }
            for genre in split_list(field(&record, GENRE, "genre")?) {
                catalog.genres.insert(genre, id);
            }

            catalog.movies.push(movie);
        }

        Ok(catalog)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub password: String,
}

pub fn read_users<R: io::Read>(reader: R) -> AppResult<Vec<UserRecord>> {
    let mut users = Vec::new();
    for record in csv_reader(reader).records() {
        let record = record?;
        users.push(UserRecord {
            id: parse_required(&record, 0, "user id")?,
            username: non_empty(&record, 1, "username")?.to_string(),
            password: non_empty(&record, 2, "password")?.to_string(),
        });
    }
    Ok(users)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRecord {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub review: String,
    pub timestamp: Timestamp,
}

pub fn read_reviews<R: io::Read>(reader: R) -> AppResult<Vec<ReviewRecord>> {
    let mut reviews = Vec::new();
    for record in csv_reader(reader).records() {
        let record = record?;
        let raw = field(&record, 4, "timestamp")?;
        let timestamp = parse_timestamp(raw).ok_or_else(|| ImportError::InvalidField {
            line: line_of(&record),
            field: "timestamp",
            value: raw.to_string(),
        })?;
        reviews.push(ReviewRecord {
            id: parse_required(&record, 0, "review id")?,
            user_id: parse_required(&record, 1, "user id")?,
            movie_id: parse_required(&record, 2, "movie id")?,
            review: field(&record, 3, "review")?.to_string(),
            timestamp,
        });
    }
    Ok(reviews)
}

/// Accepts RFC 3339 instants as well as naive `YYYY-MM-DD HH:MM:SS` values,
/// which are taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts);
    }
    let naive: civil::DateTime = raw.parse().ok()?;
    naive.to_zoned(TimeZone::UTC).ok().map(|zdt| zdt.timestamp())
}

fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().has_headers(true).flexible(true).trim(Trim::All).from_reader(reader)
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn field<'r>(record: &'r StringRecord, idx: usize, name: &'static str) -> AppResult<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| ImportError::MissingField { line: line_of(record), field: name }.into())
}

fn non_empty<'r>(record: &'r StringRecord, idx: usize, name: &'static str) -> AppResult<&'r str> {
    let value = field(record, idx, name)?;
    if value.is_empty() {
        return Err(ImportError::MissingField { line: line_of(record), field: name }.into());
    }
    Ok(value)
}

fn parse_required<T: std::str::FromStr>(
    record: &StringRecord,
    idx: usize,
    name: &'static str,
) -> AppResult<T> {
    let raw = non_empty(record, idx, name)?;
    raw.parse().map_err(|_| {
        ImportError::InvalidField { line: line_of(record), field: name, value: raw.to_string() }
            .into()
    })
}

/// Blank and absent trailing columns both read as `None`.
fn parse_optional<T: std::str::FromStr>(
    record: &StringRecord,
    idx: usize,
    name: &'static str,
) -> AppResult<Option<T>> {
    match record.get(idx) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            ImportError::InvalidField { line: line_of(record), field: name, value: raw.to_string() }
                .into()
        }),
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
