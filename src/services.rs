use rand::seq::index;
use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::{
    entities::movie,
    error::AppResult,
    models::MovieSummary,
    repository::Repository,
};

pub async fn director_full_names<C>(repo: &Repository<C>) -> AppResult<Vec<String>>
where
    C: ConnectionTrait + TransactionTrait,
{
    Ok(repo.get_directors().await?.into_iter().map(|d| d.name).collect())
}

pub async fn actor_full_names<C>(repo: &Repository<C>) -> AppResult<Vec<String>>
where
    C: ConnectionTrait + TransactionTrait,
{
    Ok(repo.get_actors().await?.into_iter().map(|a| a.name).collect())
}

pub async fn genre_names<C>(repo: &Repository<C>) -> AppResult<Vec<String>>
where
    C: ConnectionTrait + TransactionTrait,
{
    Ok(repo.get_genres().await?.into_iter().map(|g| g.name).collect())
}

/// Up to `quantity` distinct movies picked at random, ordered by id. Asking
/// for more than exist returns every movie.
pub async fn random_movies<C>(repo: &Repository<C>, quantity: usize) -> AppResult<Vec<MovieSummary>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let ids = repo.get_movie_ids().await?;
    let picked: Vec<i32> = {
        let mut rng = rand::rng();
        index::sample(&mut rng, ids.len(), quantity.min(ids.len()))
            .into_iter()
            .map(|i| ids[i])
            .collect()
    };

    let movies = repo.get_movies_by_id(&picked).await?;
    summarize(repo, movies).await
}

pub async fn summarize<C>(
    repo: &Repository<C>,
    movies: Vec<movie::Model>,
) -> AppResult<Vec<MovieSummary>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut summaries = Vec::with_capacity(movies.len());
    for movie in movies {
        let directors = repo.get_directors_for_movie(movie.id).await?;
        summaries.push(MovieSummary {
            movie_id: movie.id,
            title: movie.title,
            release_year: movie.release_year,
            directors: directors.into_iter().map(|d| d.name).collect(),
        });
    }
    Ok(summaries)
}
