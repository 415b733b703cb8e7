use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};

#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// True when the underlying database error is a unique-constraint violation,
    /// e.g. inserting a username that is already taken.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.0.downcast_ref::<DbErr>().and_then(DbErr::sql_err),
            Some(SqlErr::UniqueConstraintViolation(_))
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self.0.downcast_ref::<DbErr>().and_then(DbErr::sql_err),
            Some(SqlErr::ForeignKeyConstraintViolation(_))
        )
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<crate::catalog::ImportError> for AppError {
    fn from(err: crate::catalog::ImportError) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<crate::password::PasswordError> for AppError {
    fn from(err: crate::password::PasswordError) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
