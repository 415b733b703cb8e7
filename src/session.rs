use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// A database transaction scoped to one HTTP request.
///
/// Extracting it opens the transaction; handlers reach the data through
/// [`RequestSession::repo`] and finish with [`RequestSession::commit`].
/// A session dropped without a commit rolls back.
pub struct RequestSession {
    repo: Repository<DatabaseTransaction>,
}

impl RequestSession {
    pub async fn begin(db: &DatabaseConnection) -> AppResult<Self> {
        Ok(Self { repo: Repository::new(db.begin().await?) })
    }

    pub fn repo(&self) -> &Repository<DatabaseTransaction> {
        &self.repo
    }

    pub async fn commit(self) -> AppResult<()> {
        self.repo.into_inner().commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> AppResult<()> {
        self.repo.into_inner().rollback().await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for RequestSession
where
    S: Send + Sync,
    DatabaseConnection: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = DatabaseConnection::from_ref(state);
        Self::begin(&db).await
    }
}
