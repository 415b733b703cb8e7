use anyhow::anyhow;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::{
    entities::{
        actor, director, genre, movie, movie_actor, movie_director, movie_genre, review, user,
    },
    error::AppResult,
    models::{MovieDetails, NewMovie, NewReview},
};

/// Query and insert wrappers over the movie schema.
///
/// `C` is any sea-orm connection: the shared [`DatabaseConnection`] for
/// application code, or a [`sea_orm::DatabaseTransaction`] when the caller
/// wants several operations to commit or roll back together (see
/// [`crate::session::RequestSession`]). Each `add_*` call runs in its own
/// transaction, nested as a savepoint when `C` is already one.
///
/// Lookups that find nothing return `Ok(None)` or an empty `Vec`; only
/// database failures are errors.
#[derive(Clone, Debug)]
pub struct Repository<C = DatabaseConnection> {
    conn: C,
}

impl<C> Repository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &C {
        &self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl<C> Repository<C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub async fn add_user(&self, username: &str, password_hash: &str) -> AppResult<user::Model> {
        let txn = self.conn.begin().await?;
        let user = user::ActiveModel {
            username: Set(username.to_string()),
            password: Set(password_hash.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(user_id = user.id, username = %user.username, "added user");
        Ok(user)
    }

    pub async fn get_user(&self, username: &str) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await?)
    }

    pub async fn add_movie(&self, movie: NewMovie) -> AppResult<movie::Model> {
        let txn = self.conn.begin().await?;
        let mut model = movie::ActiveModel {
            title: Set(movie.title),
            release_year: Set(movie.release_year),
            description: Set(movie.description),
            runtime_minutes: Set(movie.runtime_minutes),
            rating: Set(movie.rating),
            votes: Set(movie.votes),
            revenue_millions: Set(movie.revenue_millions),
            metascore: Set(movie.metascore),
            ..Default::default()
        };
        if let Some(id) = movie.id {
            model.id = Set(id);
        }
        let movie = model.insert(&txn).await?;
        txn.commit().await?;

        debug!(movie_id = movie.id, title = %movie.title, "added movie");
        Ok(movie)
    }

    pub async fn get_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_movies(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Id).all(&self.conn).await?)
    }

    pub async fn get_movie_ids(&self) -> AppResult<Vec<i32>> {
        Ok(movie::Entity::find()
            .select_only()
            .column(movie::Column::Id)
            .order_by_asc(movie::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await?)
    }

    /// `None` means no filter: every movie is returned.
    pub async fn get_movies_by_release_year(
        &self,
        year: Option<i32>,
    ) -> AppResult<Vec<movie::Model>> {
        let mut query = movie::Entity::find();
        if let Some(year) = year {
            query = query.filter(movie::Column::ReleaseYear.eq(year));
        }
        Ok(query.order_by_asc(movie::Column::Id).all(&self.conn).await?)
    }

    pub async fn get_number_of_movies(&self) -> AppResult<u64> {
        Ok(movie::Entity::find().count(&self.conn).await?)
    }

    pub async fn get_first_movie(&self) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find().order_by_asc(movie::Column::Id).one(&self.conn).await?)
    }

    pub async fn get_last_movie(&self) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find().order_by_desc(movie::Column::Id).one(&self.conn).await?)
    }

    /// Unknown ids are skipped. Results are ordered by id, not by `ids`.
    pub async fn get_movies_by_id(&self, ids: &[i32]) -> AppResult<Vec<movie::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(movie::Entity::find()
            .filter(movie::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(movie::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_movie_ids_for_genre(&self, name: &str) -> AppResult<Vec<i32>> {
        let Some(genre) = genre::Entity::find()
            .filter(genre::Column::Name.eq(name))
            .order_by_asc(genre::Column::Id)
            .one(&self.conn)
            .await?
        else {
            return Ok(Vec::new());
        };

        Ok(movie_genre::Entity::find()
            .select_only()
            .column(movie_genre::Column::MovieId)
            .filter(movie_genre::Column::GenreId.eq(genre.id))
            .order_by_asc(movie_genre::Column::MovieId)
            .into_tuple()
            .all(&self.conn)
            .await?)
    }

    pub async fn get_movie_ids_for_director(&self, name: &str) -> AppResult<Vec<i32>> {
        let Some(director) = director::Entity::find()
            .filter(director::Column::Name.eq(name))
            .order_by_asc(director::Column::Id)
            .one(&self.conn)
            .await?
        else {
            return Ok(Vec::new());
        };

        Ok(movie_director::Entity::find()
            .select_only()
            .column(movie_director::Column::MovieId)
            .filter(movie_director::Column::DirectorId.eq(director.id))
            .order_by_asc(movie_director::Column::MovieId)
            .into_tuple()
            .all(&self.conn)
            .await?)
    }

    pub async fn get_movie_ids_for_actor(&self, name: &str) -> AppResult<Vec<i32>> {
        let Some(actor) = actor::Entity::find()
            .filter(actor::Column::Name.eq(name))
            .order_by_asc(actor::Column::Id)
            .one(&self.conn)
            .await?
        else {
            return Ok(Vec::new());
        };

        Ok(movie_actor::Entity::find()
            .select_only()
            .column(movie_actor::Column::MovieId)
            .filter(movie_actor::Column::ActorId.eq(actor.id))
            .order_by_asc(movie_actor::Column::MovieId)
            .into_tuple()
            .all(&self.conn)
            .await?)
    }

    pub async fn get_genres(&self) -> AppResult<Vec<genre::Model>> {
        Ok(genre::Entity::find().order_by_asc(genre::Column::Id).all(&self.conn).await?)
    }

    pub async fn add_genre(&self, name: &str) -> AppResult<genre::Model> {
        let txn = self.conn.begin().await?;
        let genre = genre::ActiveModel { name: Set(name.to_string()), ..Default::default() }
            .insert(&txn)
            .await?;
        txn.commit().await?;
        Ok(genre)
    }

    pub async fn get_directors(&self) -> AppResult<Vec<director::Model>> {
        Ok(director::Entity::find().order_by_asc(director::Column::Id).all(&self.conn).await?)
    }

    pub async fn add_director(&self, name: &str) -> AppResult<director::Model> {
        let txn = self.conn.begin().await?;
        let director = director::ActiveModel { name: Set(name.to_string()), ..Default::default() }
            .insert(&txn)
            .await?;
        txn.commit().await?;
        Ok(director)
    }

    pub async fn get_actors(&self) -> AppResult<Vec<actor::Model>> {
        Ok(actor::Entity::find().order_by_asc(actor::Column::Id).all(&self.conn).await?)
    }

    pub async fn add_actor(&self, name: &str) -> AppResult<actor::Model> {
        let txn = self.conn.begin().await?;
        let actor = actor::ActiveModel { name: Set(name.to_string()), ..Default::default() }
            .insert(&txn)
            .await?;
        txn.commit().await?;
        Ok(actor)
    }

    pub async fn attach_genre(&self, movie_id: i32, genre_id: i32) -> AppResult<()> {
        movie_genre::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn attach_director(&self, movie_id: i32, director_id: i32) -> AppResult<()> {
        movie_director::ActiveModel {
            movie_id: Set(movie_id),
            director_id: Set(director_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn attach_actor(&self, movie_id: i32, actor_id: i32) -> AppResult<()> {
        movie_actor::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(actor_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn get_genres_for_movie(&self, movie_id: i32) -> AppResult<Vec<genre::Model>> {
        Ok(genre::Entity::find()
            .inner_join(movie_genre::Entity)
            .filter(movie_genre::Column::MovieId.eq(movie_id))
            .order_by_asc(genre::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_directors_for_movie(&self, movie_id: i32) -> AppResult<Vec<director::Model>> {
        Ok(director::Entity::find()
            .inner_join(movie_director::Entity)
            .filter(movie_director::Column::MovieId.eq(movie_id))
            .order_by_asc(director::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_actors_for_movie(&self, movie_id: i32) -> AppResult<Vec<actor::Model>> {
        Ok(actor::Entity::find()
            .inner_join(movie_actor::Entity)
            .filter(movie_actor::Column::MovieId.eq(movie_id))
            .order_by_asc(actor::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_reviews(&self) -> AppResult<Vec<review::Model>> {
        Ok(review::Entity::find().order_by_asc(review::Column::Id).all(&self.conn).await?)
    }

    /// Oldest first.
    pub async fn get_reviews_for_movie(&self, movie_id: i32) -> AppResult<Vec<review::Model>> {
        Ok(review::Entity::find()
            .filter(review::Column::MovieId.eq(movie_id))
            .order_by_asc(review::Column::Timestamp)
            .order_by_asc(review::Column::Id)
            .all(&self.conn)
            .await?)
    }

    /// Fails when the review's user or movie does not exist.
    pub async fn add_review(&self, new_review: NewReview) -> AppResult<review::Model> {
        let txn = self.conn.begin().await?;

        if user::Entity::find_by_id(new_review.user_id).one(&txn).await?.is_none() {
            return Err(anyhow!("review references unknown user {}", new_review.user_id).into());
        }
        if movie::Entity::find_by_id(new_review.movie_id).one(&txn).await?.is_none() {
            return Err(anyhow!("review references unknown movie {}", new_review.movie_id).into());
        }

        let timestamp = new_review.timestamp.unwrap_or_else(jiff::Timestamp::now);
        let saved = review::ActiveModel {
            user_id: Set(new_review.user_id),
            movie_id: Set(new_review.movie_id),
            review: Set(new_review.review),
            timestamp: Set(timestamp.as_second()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(review_id = saved.id, movie_id = saved.movie_id, "added review");
        Ok(saved)
    }

    pub async fn get_movie_details(&self, id: i32) -> AppResult<Option<MovieDetails>> {
        let Some(movie) = self.get_movie(id).await? else {
            return Ok(None);
        };

        let genres = self.get_genres_for_movie(id).await?;
        let directors = self.get_directors_for_movie(id).await?;
        let actors = self.get_actors_for_movie(id).await?;
        let reviews = movie
            .find_related(review::Entity)
            .order_by_asc(review::Column::Timestamp)
            .order_by_asc(review::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(Some(MovieDetails { movie, genres, directors, actors, reviews }))
    }
}
