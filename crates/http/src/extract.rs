//! Request extractors shared by module handlers

use std::ops::{Deref, DerefMut};

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use folio_db::{Database, PoolConnection, Sqlite, SqliteConnection};

use crate::error::AppError;

/// A pooled connection checked out for the lifetime of one request.
///
/// The connection goes back to the pool when the extractor is dropped at the
/// end of the handler, whatever the handler returned.
pub struct DbConn(pub PoolConnection<Sqlite>);

impl<S> FromRequestParts<S> for DbConn
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Database::from_ref(state);
        let conn = db
            .acquire()
            .await
            .map_err(|err| AppError::Internal(anyhow::Error::new(err)))?;
        Ok(Self(conn))
    }
}

impl Deref for DbConn {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
