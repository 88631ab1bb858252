use sqlx::SqlitePool;

use super::models::{Book, BookPayload};
use super::repository::BookRepository;
use super::validation::validate_book;
use crate::error::{RepositoryError, ServiceError};

/// Create, update and lookup of books.
#[derive(Clone)]
pub struct BookService {
    pool: SqlitePool,
}

impl BookService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> BookRepository<'_> {
        BookRepository::new(&self.pool)
    }

    /// Validate and store a new book.
    ///
    /// A concurrent insert of the same ISBN that slips past the existence
    /// check is caught by the primary key and reported the same way.
    pub async fn create_book(&self, payload: &BookPayload) -> Result<Book, ServiceError> {
        let book = validate_book(payload)?;
        let repo = self.repository();

        if repo.exists_by_isbn(&book.isbn).await? {
            return Err(duplicate_isbn());
        }

        let stored = repo.insert(&book).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => duplicate_isbn(),
            other => other.into(),
        })?;

        tracing::info!(isbn = %stored.isbn, "book created");
        Ok(stored)
    }

    /// Replace every mutable field of the book stored under `isbn`.
    pub async fn update_book(&self, isbn: &str, payload: &BookPayload) -> Result<Book, ServiceError> {
        let changes = validate_book(payload)?;
        if changes.isbn != isbn {
            return Err(ServiceError::invalid(
                "ISBN",
                "ISBN in URL does not match ISBN in request body",
            ));
        }

        let repo = self.repository();
        let existing = repo.find_by_isbn(isbn).await?.ok_or_else(book_not_found)?;

        let book = Book {
            isbn: existing.isbn,
            ..changes
        };
        let updated = repo.update(&book).await?.ok_or_else(book_not_found)?;

        tracing::info!(isbn = %updated.isbn, "book updated");
        Ok(updated)
    }

    pub async fn get_book(&self, isbn: &str) -> Result<Book, ServiceError> {
        self.repository()
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(book_not_found)
    }
}

fn duplicate_isbn() -> ServiceError {
    ServiceError::Duplicate("ISBN already exists".to_string())
}

fn book_not_found() -> ServiceError {
    ServiceError::NotFound("Book not found".to_string())
}
