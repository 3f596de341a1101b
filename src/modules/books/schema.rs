//! Persisted layout of the `books` table.

/// Table definition contributed as the module's first migration.
///
/// The `CHECK` clauses mirror the API bounds; `pages` is additionally capped
/// at the 32-bit integer range.
pub const CREATE_BOOKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id     INTEGER PRIMARY KEY CHECK (id > 0),
        title  TEXT    NOT NULL CHECK (length(title) > 0),
        author TEXT    NOT NULL CHECK (length(author) > 0),
        pages  INTEGER NOT NULL CHECK (pages BETWEEN 0 AND 2147483647),
        rating REAL    NOT NULL CHECK (rating BETWEEN 0 AND 5),
        price  REAL    NOT NULL CHECK (price BETWEEN 0 AND 9999.99)
    );
"#;

/// Column list shared by every query that reads whole rows.
pub const BOOK_COLUMNS: &str = "id, title, author, pages, rating, price";

/// One row of the `books` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub pages: i64,
    pub rating: f64,
    pub price: f64,
}
