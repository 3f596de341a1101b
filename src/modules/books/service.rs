use super::error::BookError;
use super::models::{Book, BookFilter, BookPatch, NewBook};
use super::repository::BookRepository;

/// Orchestrates book use cases over any [`BookRepository`].
///
/// Domain errors from the repository are returned unchanged.
pub struct BookService<R> {
    repository: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn get_all(&mut self) -> Result<Vec<Book>, BookError> {
        self.repository.get_all().await
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Book, BookError> {
        self.repository.get_by_id(id).await
    }

    pub async fn filter(&mut self, criteria: BookFilter) -> Result<Vec<Book>, BookError> {
        self.repository.filter(criteria).await
    }

    /// Build the entity from raw creation data and store it.
    pub async fn add(&mut self, data: NewBook) -> Result<Book, BookError> {
        let book = Book::from(data);
        self.repository.add(book).await
    }

    pub async fn update(&mut self, id: i64, patch: BookPatch) -> Result<Book, BookError> {
        self.repository.update(id, patch).await
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), BookError> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::MockBookRepository;
    use mockall::predicate::eq;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: format!("Author {}", id),
            pages: 50,
            rating: 1.0,
            price: 10.99,
        }
    }

    #[tokio::test]
    async fn test_get_book_by_id() {
        let mut mock_repo = MockBookRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(book(id, "Book 1")));
        let mut service = BookService::new(mock_repo);

        let result = service.get_by_id(1).await.unwrap();

        assert_eq!(result, book(1, "Book 1"));
    }

    #[tokio::test]
    async fn test_filter_books_passes_criteria_through() {
        let criteria = BookFilter {
            min_pages: Some(10),
            max_price: Some(11.0),
            ..BookFilter::default()
        };
        let mut mock_repo = MockBookRepository::new();
        mock_repo
            .expect_filter()
            .with(eq(criteria.clone()))
            .times(1)
            .returning(|_| Ok(vec![book(1, "Book 1"), book(2, "Book 2")]));
        let mut service = BookService::new(mock_repo);

        let result = service.filter(criteria).await.unwrap();

        assert_eq!(result, vec![book(1, "Book 1"), book(2, "Book 2")]);
    }

    #[tokio::test]
    async fn test_add_builds_entity_from_creation_data() {
        let mut mock_repo = MockBookRepository::new();
        mock_repo
            .expect_add()
            .with(eq(book(7, "Seven")))
            .times(1)
            .returning(Ok);
        let mut service = BookService::new(mock_repo);

        let created = service
            .add(NewBook {
                id: 7,
                title: "Seven".to_string(),
                author: "Author 7".to_string(),
                pages: 50,
                rating: 1.0,
                price: 10.99,
            })
            .await
            .unwrap();

        assert_eq!(created.id, 7);
    }

    #[tokio::test]
    async fn test_domain_errors_propagate_unchanged() {
        let mut mock_repo = MockBookRepository::new();
        mock_repo
            .expect_update()
            .times(1)
            .returning(|id, _| Err(BookError::NotFound(id)));
        mock_repo
            .expect_delete()
            .times(1)
            .returning(|_| Err(BookError::Storage(sqlx::Error::PoolTimedOut)));
        let mut service = BookService::new(mock_repo);

        let update = service.update(9, BookPatch::default()).await.unwrap_err();
        let delete = service.delete(9).await.unwrap_err();

        assert!(matches!(update, BookError::NotFound(9)));
        assert!(matches!(delete, BookError::Storage(_)));
    }

    #[tokio::test]
    async fn test_get_all_delegates() {
        let mut mock_repo = MockBookRepository::new();
        mock_repo
            .expect_get_all()
            .times(1)
            .returning(|| Ok(Vec::new()));
        let mut service = BookService::new(mock_repo);

        assert!(service.get_all().await.unwrap().is_empty());
    }
}
