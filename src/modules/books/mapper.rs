//! Conversions between stored rows and domain entities.

use super::models::Book;
use super::schema::BookRow;

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            pages: row.pages,
            rating: row.rating,
            price: row.price,
        }
    }
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            pages: book.pages,
            rating: book.rating,
            price: book.price,
        }
    }
}

pub fn to_entities(rows: Vec<BookRow>) -> Vec<Book> {
    rows.into_iter().map(Book::from).collect()
}
