//! Book persistence gateway.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use super::models::Book;
use crate::error::RepositoryError;

/// Internal row type for book queries. Price is stored as decimal text.
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    isbn: String,
    title: String,
    author: String,
    description: String,
    genre: String,
    price: String,
    quantity: i32,
}

impl TryFrom<BookRow> for Book {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "invalid price '{}' for book {}: {e}",
                row.price, row.isbn
            ))
        })?;

        Ok(Self {
            isbn: row.isbn,
            title: row.title,
            author: row.author,
            description: row.description,
            genre: row.genre,
            price,
            quantity: row.quantity,
        })
    }
}

/// Repository for book table operations.
pub struct BookRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookRepository<'a> {
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn exists_by_isbn(&self, isbn: &str) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = ?)")
            .bind(isbn)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT isbn, title, author, description, genre, price, quantity
            FROM books
            WHERE isbn = ?
            "#,
        )
        .bind(isbn)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new book and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the ISBN is already taken.
    pub async fn insert(&self, book: &Book) -> Result<Book, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books (isbn, title, author, description, genre, price, quantity)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING isbn, title, author, description, genre, price, quantity
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.genre)
        .bind(book.price.to_string())
        .bind(book.quantity)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        row.try_into()
    }

    /// Overwrite every mutable field of the book with the same ISBN.
    ///
    /// Returns `None` if no such book exists.
    pub async fn update(&self, book: &Book) -> Result<Option<Book>, RepositoryError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            UPDATE books
            SET title = ?, author = ?, description = ?, genre = ?, price = ?, quantity = ?
            WHERE isbn = ?
            RETURNING isbn, title, author, description, genre, price, quantity
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.genre)
        .bind(book.price.to_string())
        .bind(book.quantity)
        .bind(&book.isbn)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        row.map(TryInto::try_into).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_pool;

    fn book(isbn: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: "The Left Hand of Darkness".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            description: "Winter".to_string(),
            genre: "Science fiction".to_string(),
            price: Decimal::new(1450, 2),
            quantity: 4,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let pool = test_pool().await;
        let repo = BookRepository::new(&pool);

        assert!(!repo.exists_by_isbn("978-0441478125").await.unwrap());
        let stored = repo.insert(&book("978-0441478125")).await.unwrap();

        assert_eq!(stored, book("978-0441478125"));
        assert!(repo.exists_by_isbn("978-0441478125").await.unwrap());
        assert_eq!(
            repo.find_by_isbn("978-0441478125").await.unwrap(),
            Some(book("978-0441478125"))
        );
    }

    #[tokio::test]
    async fn find_missing_is_none() {
        let pool = test_pool().await;
        let repo = BookRepository::new(&pool);

        assert_eq!(repo.find_by_isbn("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_insert_is_conflict() {
        let pool = test_pool().await;
        let repo = BookRepository::new(&pool);

        repo.insert(&book("111")).await.unwrap();
        let err = repo.insert(&book("111")).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn update_overwrites_fields() {
        let pool = test_pool().await;
        let repo = BookRepository::new(&pool);
        repo.insert(&book("111")).await.unwrap();

        let changed = Book {
            title: "The Dispossessed".to_string(),
            price: Decimal::new(999, 2),
            quantity: 0,
            ..book("111")
        };
        assert_eq!(repo.update(&changed).await.unwrap(), Some(changed.clone()));
        assert_eq!(repo.find_by_isbn("111").await.unwrap(), Some(changed));
    }

    #[tokio::test]
    async fn update_missing_is_none() {
        let pool = test_pool().await;
        let repo = BookRepository::new(&pool);

        assert_eq!(repo.update(&book("222")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_price_is_reported() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO books (isbn, title, author, description, genre, price, quantity)
             VALUES ('333', 't', 'a', 'd', 'g', 'lots', 1)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let err = BookRepository::new(&pool)
            .find_by_isbn("333")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
