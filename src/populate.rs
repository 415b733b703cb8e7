use std::{fs::File, path::Path};

use anyhow::Context;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, Set, TransactionTrait};
use tracing::{debug, info};

use crate::{
    catalog::{
        Catalog, MOVIES_FILE, NameIndex, REVIEWS_FILE, ReviewRecord, USERS_FILE, UserRecord,
        read_reviews, read_users,
    },
    entities::{
        actor, director, genre, movie, movie_actor, movie_director, movie_genre, review, user,
    },
    error::AppResult,
    models::PopulateSummary,
    password,
};

// Keeps every multi-row INSERT well under SQLite's bound-parameter limit.
const INSERT_BATCH: usize = 100;

/// Loads the CSV files under `data_path` into an empty schema.
///
/// Everything is parsed (and every password hashed) before the first write,
/// and all rows go in through one transaction, so a bad input file leaves the
/// database untouched.
pub async fn populate<C>(db: &C, data_path: &Path) -> AppResult<PopulateSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    let movies_path = data_path.join(MOVIES_FILE);
    let catalog = Catalog::from_reader(
        File::open(&movies_path).with_context(|| format!("opening {}", movies_path.display()))?,
    )?;

    let users_path = data_path.join(USERS_FILE);
    let users = read_users(
        File::open(&users_path).with_context(|| format!("opening {}", users_path.display()))?,
    )?;

    let reviews_path = data_path.join(REVIEWS_FILE);
    let reviews = if reviews_path.exists() {
        read_reviews(File::open(&reviews_path)?)?
    } else {
        debug!(path = %reviews_path.display(), "no reviews file, skipping");
        Vec::new()
    };

    debug!(movies = catalog.movies.len(), users = users.len(), "parsed input files");

    let users = hash_passwords(users).await?;

    let txn = db.begin().await?;
    let summary = write_all(&txn, &catalog, users, reviews).await?;
    txn.commit().await?;

    info!(
        movies = summary.movies,
        directors = summary.directors,
        actors = summary.actors,
        genres = summary.genres,
        movie_directors = summary.movie_directors,
        movie_actors = summary.movie_actors,
        movie_genres = summary.movie_genres,
        users = summary.users,
        reviews = summary.reviews,
        "database populated"
    );

    Ok(summary)
}

async fn hash_passwords(users: Vec<UserRecord>) -> AppResult<Vec<UserRecord>> {
    let hashed = tokio::task::spawn_blocking(move || {
        users
            .into_iter()
            .map(|u| {
                let password = password::hash_password(&u.password)?;
                Ok(UserRecord { password, ..u })
            })
            .collect::<Result<Vec<_>, password::PasswordError>>()
    })
    .await
    .context("password hashing task failed")??;
    Ok(hashed)
}

async fn write_all<C: ConnectionTrait>(
    db: &C,
    catalog: &Catalog,
    users: Vec<UserRecord>,
    reviews: Vec<ReviewRecord>,
) -> AppResult<PopulateSummary> {
    let summary = PopulateSummary {
        movies: catalog.movies.len(),
        directors: catalog.directors.len(),
        actors: catalog.actors.len(),
        genres: catalog.genres.len(),
        movie_directors: catalog.directors.link_count(),
        movie_actors: catalog.actors.link_count(),
        movie_genres: catalog.genres.link_count(),
        users: users.len(),
        reviews: reviews.len(),
    };

    let movies = catalog
        .movies
        .iter()
        .map(|m| movie::ActiveModel {
            id: m.id.map_or(NotSet, Set),
            title: Set(m.title.clone()),
            release_year: Set(m.release_year),
            description: Set(m.description.clone()),
            runtime_minutes: Set(m.runtime_minutes),
            rating: Set(m.rating),
            votes: Set(m.votes),
            revenue_millions: Set(m.revenue_millions),
            metascore: Set(m.metascore),
        })
        .collect();
    insert_batched(db, movies).await?;

    insert_batched(db, named(&catalog.directors, |id, name| director::ActiveModel {
        id: Set(id),
        name: Set(name),
    }))
    .await?;
    insert_batched(db, named(&catalog.actors, |id, name| actor::ActiveModel {
        id: Set(id),
        name: Set(name),
    }))
    .await?;
    insert_batched(db, named(&catalog.genres, |id, name| genre::ActiveModel {
        id: Set(id),
        name: Set(name),
    }))
    .await?;

    let movie_directors = catalog
        .directors
        .links()
        .map(|l| movie_director::ActiveModel {
            id: Set(l.id),
            movie_id: Set(l.movie_id),
            director_id: Set(l.target_id),
        })
        .collect();
    insert_batched(db, movie_directors).await?;

    let movie_actors = catalog
        .actors
        .links()
        .map(|l| movie_actor::ActiveModel {
            id: Set(l.id),
            movie_id: Set(l.movie_id),
            actor_id: Set(l.target_id),
        })
        .collect();
    insert_batched(db, movie_actors).await?;

    let movie_genres = catalog
        .genres
        .links()
        .map(|l| movie_genre::ActiveModel {
            id: Set(l.id),
            movie_id: Set(l.movie_id),
            genre_id: Set(l.target_id),
        })
        .collect();
    insert_batched(db, movie_genres).await?;

    let users = users
        .into_iter()
        .map(|u| user::ActiveModel {
            id: Set(u.id),
            username: Set(u.username),
            password: Set(u.password),
        })
        .collect();
    insert_batched(db, users).await?;

    let reviews = reviews
        .into_iter()
        .map(|r| review::ActiveModel {
            id: Set(r.id),
            user_id: Set(r.user_id),
            movie_id: Set(r.movie_id),
            review: Set(r.review),
            timestamp: Set(r.timestamp.as_second()),
        })
        .collect();
    insert_batched(db, reviews).await?;

    Ok(summary)
}

fn named<A>(index: &NameIndex, build: impl Fn(i32, String) -> A) -> Vec<A> {
    index.records().map(|r| build(r.id, r.name.to_string())).collect()
}

async fn insert_batched<A, C>(db: &C, mut rows: Vec<A>) -> AppResult<()>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
{
    while !rows.is_empty() {
        let rest = rows.split_off(rows.len().min(INSERT_BATCH));
        A::Entity::insert_many(rows).exec(db).await?;
        rows = rest;
    }
    Ok(())
}
