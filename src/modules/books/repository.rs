//! Storage access for book records.

use async_trait::async_trait;
use folio_db::{Sqlite, SqliteConnection};
use sqlx::{Connection, QueryBuilder};

use super::error::BookError;
use super::mapper;
use super::models::{Book, BookFilter, BookPatch};
use super::schema::{BookRow, BOOK_COLUMNS};

/// Operations the service needs from book storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send {
    /// Every stored book ordered by id.
    async fn get_all(&mut self) -> Result<Vec<Book>, BookError>;

    async fn get_by_id(&mut self, id: i64) -> Result<Book, BookError>;

    /// Books matching every supplied criterion, ordered by id.
    async fn filter(&mut self, criteria: BookFilter) -> Result<Vec<Book>, BookError>;

    /// Insert a new book and return the stored row.
    async fn add(&mut self, book: Book) -> Result<Book, BookError>;

    /// Apply the present fields of `patch` and return the stored row.
    async fn update(&mut self, id: i64, patch: BookPatch) -> Result<Book, BookError>;

    async fn delete(&mut self, id: i64) -> Result<(), BookError>;
}

/// SQLite-backed repository bound to one checked-out connection.
///
/// Every mutation runs in its own transaction; an error drops the
/// transaction uncommitted so nothing partial survives.
pub struct SqliteBookRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteBookRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository<'_> {
    async fn get_all(&mut self) -> Result<Vec<Book>, BookError> {
        let sql = format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS);
        let rows = sqlx::query_as::<_, BookRow>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(mapper::to_entities(rows))
    }

    async fn get_by_id(&mut self, id: i64) -> Result<Book, BookError> {
        let sql = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, BookRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(BookError::NotFound(id))?;

        Ok(row.into())
    }

    async fn filter(&mut self, criteria: BookFilter) -> Result<Vec<Book>, BookError> {
        let BookFilter {
            title,
            min_pages,
            max_pages,
            min_rating,
            max_rating,
            min_price,
            max_price,
        } = criteria;

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM books WHERE 1 = 1", BOOK_COLUMNS));

        if let Some(min_pages) = min_pages {
            query.push(" AND pages >= ").push_bind(min_pages);
        }
        if let Some(max_pages) = max_pages {
            query.push(" AND pages <= ").push_bind(max_pages);
        }
        if let Some(min_rating) = min_rating {
            query.push(" AND rating >= ").push_bind(min_rating);
        }
        if let Some(max_rating) = max_rating {
            query.push(" AND rating <= ").push_bind(max_rating);
        }
        if let Some(min_price) = min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
        query.push(" ORDER BY id");

        let rows = query
            .build_query_as::<BookRow>()
            .fetch_all(&mut *self.conn)
            .await?;
        let mut books = mapper::to_entities(rows);

        // SQLite's lower() folds ASCII only, so titles are matched here
        if let Some(title) = title {
            let needle = title.to_lowercase();
            books.retain(|book| book.title.to_lowercase().contains(&needle));
        }

        Ok(books)
    }

    async fn add(&mut self, book: Book) -> Result<Book, BookError> {
        let row = BookRow::from(&book);
        let sql = format!(
            "INSERT INTO books ({0}) VALUES (?, ?, ?, ?, ?, ?) RETURNING {0}",
            BOOK_COLUMNS
        );

        let mut tx = self.conn.begin().await?;
        let inserted = sqlx::query_as::<_, BookRow>(&sql)
            .bind(row.id)
            .bind(row.title)
            .bind(row.author)
            .bind(row.pages)
            .bind(row.rating)
            .bind(row.price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    BookError::AlreadyExists(book.id)
                }
                _ => BookError::from(err),
            })?;
        tx.commit().await?;

        Ok(inserted.into())
    }

    async fn update(&mut self, id: i64, patch: BookPatch) -> Result<Book, BookError> {
        let select = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        let update = format!(
            "UPDATE books SET title = ?, author = ?, pages = ?, rating = ?, price = ? \
             WHERE id = ? RETURNING {}",
            BOOK_COLUMNS
        );

        let mut tx = self.conn.begin().await?;
        let current = sqlx::query_as::<_, BookRow>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(BookError::NotFound(id))?;

        let mut book = Book::from(current);
        patch.apply_to(&mut book);

        let updated = sqlx::query_as::<_, BookRow>(&update)
            .bind(book.title)
            .bind(book.author)
            .bind(book.pages)
            .bind(book.rating)
            .bind(book.price)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(updated.into())
    }

    async fn delete(&mut self, id: i64) -> Result<(), BookError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BookError::NotFound(id));
        }
        tx.commit().await?;

        Ok(())
    }
}
