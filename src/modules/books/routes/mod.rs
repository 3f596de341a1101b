//! HTTP handlers for the books module.

pub mod payload;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use folio_db::Database;
use folio_http::{error::AppError, extract::DbConn};

use super::models::Book;
use super::repository::SqliteBookRepository;
use super::service::BookService;
use crate::utils;
use payload::{BookPayload, BookQuery, BookUpdatePayload};

/// Routes served by the books module, relative to its mount path.
pub fn router(db: Database) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(db)
}

/// List every book, or only those matching the query criteria
async fn list_books(
    query: Result<Query<BookQuery>, QueryRejection>,
    mut conn: DbConn,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let mut service = BookService::new(SqliteBookRepository::new(&mut conn));

    let books = if filter.is_empty() {
        service.get_all().await?
    } else {
        tracing::debug!(target: "folio::books", ?filter, "filtering books");
        service.filter(filter).await?
    };

    tracing::info!(target: "folio::books", count = books.len(), "[GET] books listed");
    Ok(Json(books))
}

async fn get_book(
    id: Result<Path<i64>, PathRejection>,
    mut conn: DbConn,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    let mut service = BookService::new(SqliteBookRepository::new(&mut conn));

    let book = service.get_by_id(id).await?;

    tracing::info!(target: "folio::books", book_id = book.id, "[GET] book retrieved");
    Ok(Json(book))
}

/// Create a book; a missing id is drawn from the placeholder id range
async fn create_book(
    mut conn: DbConn,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload?;
    let data = payload.into_new_book(utils::random_book_id)?;
    let mut service = BookService::new(SqliteBookRepository::new(&mut conn));

    let book = service.add(data).await?;

    tracing::info!(target: "folio::books", book_id = book.id, title = %book.title, "[POST] book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    id: Result<Path<i64>, PathRejection>,
    mut conn: DbConn,
    payload: Result<Json<BookUpdatePayload>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = payload.into_patch()?;
    let mut service = BookService::new(SqliteBookRepository::new(&mut conn));

    let book = service.update(id, patch).await?;

    tracing::info!(target: "folio::books", book_id = book.id, "[PUT] book updated");
    Ok(Json(book))
}

async fn delete_book(
    id: Result<Path<i64>, PathRejection>,
    mut conn: DbConn,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    let mut service = BookService::new(SqliteBookRepository::new(&mut conn));

    service.delete(id).await?;

    tracing::info!(target: "folio::books", book_id = id, "[DELETE] book deleted");
    Ok(StatusCode::NO_CONTENT)
}
