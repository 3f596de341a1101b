use serde::{Deserialize, Serialize};

/// A book record, independent of how it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Page count
    pub pages: i64,
    /// Reader rating in `[0, 5]`
    pub rating: f64,
    /// Price in `[0, 9999.99]`
    pub price: f64,
}

/// Raw creation data; the id has already been chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub pages: i64,
    pub rating: f64,
    pub price: f64,
}

impl From<NewBook> for Book {
    fn from(data: NewBook) -> Self {
        Self {
            id: data.id,
            title: data.title,
            author: data.author,
            pages: data.pages,
            rating: data.rating,
            price: data.price,
        }
    }
}

/// Fields to change on an existing book; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<i64>,
    pub rating: Option<f64>,
    pub price: Option<f64>,
}

impl BookPatch {
    /// Overwrite the fields present in the patch.
    pub fn apply_to(self, book: &mut Book) {
        let BookPatch {
            title,
            author,
            pages,
            rating,
            price,
        } = self;

        if let Some(title) = title {
            book.title = title;
        }
        if let Some(author) = author {
            book.author = author;
        }
        if let Some(pages) = pages {
            book.pages = pages;
        }
        if let Some(rating) = rating {
            book.rating = rating;
        }
        if let Some(price) = price {
            book.price = price;
        }
    }
}

/// Listing criteria, ANDed together. Range bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    pub min_pages: Option<i64>,
    pub max_pages: Option<i64>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl BookFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
