//! Request shapes accepted by the books endpoints and their bounds checks.

use folio_http::error::AppError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::modules::books::models::{BookFilter, BookPatch, NewBook};

pub const MAX_RATING: f64 = 5.0;
pub const MAX_PRICE: f64 = 9999.99;

/// Body of `POST /books`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPayload {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub pages: i64,
    pub rating: f64,
    pub price: f64,
}

impl BookPayload {
    /// Check bounds and produce creation data, calling `assign_id` when the
    /// body carries no id.
    pub fn into_new_book(self, assign_id: impl FnOnce() -> i64) -> Result<NewBook, AppError> {
        let mut violations = Violations::default();
        if let Some(id) = self.id {
            violations.check(id > 0, "id", "must be greater than 0");
        }
        violations.text("title", &self.title);
        violations.text("author", &self.author);
        violations.pages(self.pages);
        violations.rating(self.rating);
        violations.price(self.price);
        violations.finish("book payload failed validation")?;

        Ok(NewBook {
            id: self.id.unwrap_or_else(assign_id),
            title: self.title,
            author: self.author,
            pages: self.pages,
            rating: self.rating,
            price: self.price,
        })
    }
}

/// Body of `PUT /books/{id}`; absent and `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookUpdatePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub pages: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl BookUpdatePayload {
    pub fn into_patch(self) -> Result<BookPatch, AppError> {
        let mut violations = Violations::default();
        if let Some(title) = &self.title {
            violations.text("title", title);
        }
        if let Some(author) = &self.author {
            violations.text("author", author);
        }
        if let Some(pages) = self.pages {
            violations.pages(pages);
        }
        if let Some(rating) = self.rating {
            violations.rating(rating);
        }
        if let Some(price) = self.price {
            violations.price(price);
        }
        violations.finish("book update failed validation")?;

        Ok(BookPatch {
            title: self.title,
            author: self.author,
            pages: self.pages,
            rating: self.rating,
            price: self.price,
        })
    }
}

/// Query string of the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub min_pages: Option<i64>,
    pub max_pages: Option<i64>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl BookQuery {
    pub fn into_filter(self) -> Result<BookFilter, AppError> {
        let mut violations = Violations::default();
        for (field, value) in [("min_pages", self.min_pages), ("max_pages", self.max_pages)] {
            if let Some(pages) = value {
                violations.check(pages >= 0, field, "must be greater than or equal to 0");
            }
        }
        for (field, value) in [
            ("min_rating", self.min_rating),
            ("max_rating", self.max_rating),
        ] {
            if let Some(rating) = value {
                violations.check(
                    (0.0..=MAX_RATING).contains(&rating),
                    field,
                    "must be between 0 and 5",
                );
            }
        }
        for (field, value) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(price) = value {
                violations.check(price >= 0.0, field, "must be greater than or equal to 0");
            }
        }
        violations.finish("book filter failed validation")?;

        Ok(BookFilter {
            title: self.title,
            min_pages: self.min_pages,
            max_pages: self.max_pages,
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            min_price: self.min_price,
            max_price: self.max_price,
        })
    }
}

/// Collects one detail entry per offending field.
#[derive(Debug, Default)]
struct Violations(Vec<Value>);

impl Violations {
    fn check(&mut self, ok: bool, field: &str, error: &str) {
        if !ok {
            self.0.push(json!({ "field": field, "error": error }));
        }
    }

    fn text(&mut self, field: &str, value: &str) {
        self.check(!value.is_empty(), field, "must not be empty");
    }

    fn pages(&mut self, pages: i64) {
        self.check(pages >= 0, "pages", "must be greater than or equal to 0");
    }

    fn rating(&mut self, rating: f64) {
        self.check(
            (0.0..=MAX_RATING).contains(&rating),
            "rating",
            "must be between 0 and 5",
        );
    }

    fn price(&mut self, price: f64) {
        self.check(
            (0.0..=MAX_PRICE).contains(&price),
            "price",
            "must be between 0 and 9999.99",
        );
    }

    fn finish(self, message: &str) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BookPayload {
        BookPayload {
            id: None,
            title: "The Added Book".to_string(),
            author: "Adder Addition".to_string(),
            pages: 50,
            rating: 2.2,
            price: 5.99,
        }
    }

    fn fields(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation { details, .. } => details
                .iter()
                .map(|detail| detail["field"].as_str().unwrap().to_string())
                .collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn missing_id_is_assigned() {
        let book = payload().into_new_book(|| 4242).unwrap();
        assert_eq!(book.id, 4242);
    }

    #[test]
    fn explicit_id_is_kept() {
        let book = BookPayload {
            id: Some(4),
            ..payload()
        }
        .into_new_book(|| unreachable!("id was supplied"))
        .unwrap();
        assert_eq!(book.id, 4);
    }

    #[test]
    fn every_out_of_bounds_field_is_reported() {
        let err = BookPayload {
            id: Some(0),
            title: String::new(),
            author: String::new(),
            pages: -1,
            rating: 5.1,
            price: 10_000.0,
        }
        .into_new_book(|| 1000)
        .unwrap_err();

        assert_eq!(
            fields(err),
            vec!["id", "title", "author", "pages", "rating", "price"]
        );
    }

    #[test]
    fn whitespace_text_counts_as_present() {
        let book = BookPayload {
            title: " ".to_string(),
            author: "\t".to_string(),
            ..payload()
        }
        .into_new_book(|| 1000)
        .unwrap();
        assert_eq!(book.title, " ");

        let patch = BookUpdatePayload {
            author: Some(" ".to_string()),
            ..BookUpdatePayload::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.author.as_deref(), Some(" "));
    }

    #[test]
    fn bounds_are_inclusive() {
        let book = BookPayload {
            pages: 0,
            rating: 5.0,
            price: MAX_PRICE,
            ..payload()
        }
        .into_new_book(|| 1000);
        assert!(book.is_ok());
    }

    #[test]
    fn update_checks_only_present_fields() {
        let patch = BookUpdatePayload {
            title: Some("X".to_string()),
            ..BookUpdatePayload::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("X"));
        assert_eq!(patch.pages, None);

        let err = BookUpdatePayload {
            rating: Some(-0.5),
            ..BookUpdatePayload::default()
        }
        .into_patch()
        .unwrap_err();
        assert_eq!(fields(err), vec!["rating"]);
    }

    #[test]
    fn update_ignores_unknown_fields() {
        let update: BookUpdatePayload =
            serde_json::from_value(json!({ "title": "X", "isbn": "123" })).unwrap();
        assert_eq!(update.title.as_deref(), Some("X"));
    }

    #[test]
    fn query_bounds_are_checked() {
        let err = BookQuery {
            min_pages: Some(-3),
            max_rating: Some(7.0),
            min_price: Some(-1.0),
            ..BookQuery::default()
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(fields(err), vec!["min_pages", "max_rating", "min_price"]);

        let filter = BookQuery {
            title: Some("dune".to_string()),
            ..BookQuery::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.title.as_deref(), Some("dune"));
    }
}
