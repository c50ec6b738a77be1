//! Catalog management service

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        book::{BookDetails, BookShort, CreateBook, UpdateBook},
        copy::{CopyDetails, CreateCopy, LoanStatus, UpdateCopy},
        genre::{CreateGenre, Genre, UpdateGenre},
        language::{CreateLanguage, Language, UpdateLanguage},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // -----------------------------------------------------------------------
    // Genres
    // -----------------------------------------------------------------------

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.create(&genre).await
    }

    pub async fn update_genre(&self, id: i32, genre: UpdateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.get_by_id(id).await?;
        self.repository.genres.update(id, &genre).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await
    }

    // -----------------------------------------------------------------------
    // Languages
    // -----------------------------------------------------------------------

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        language
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.languages.create(&language).await
    }

    pub async fn update_language(&self, id: i32, language: UpdateLanguage) -> AppResult<Language> {
        language
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.languages.get_by_id(id).await?;
        self.repository.languages.update(id, &language).await
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await
    }

    // -----------------------------------------------------------------------
    // Authors
    // -----------------------------------------------------------------------

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        self.repository.authors.get_details(id).await
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(&author).await
    }

    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.get_by_id(id).await?;
        self.repository.authors.update(id, &author).await
    }

    /// Delete an author. Their books stay, with the author reference nulled.
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // -----------------------------------------------------------------------
    // Books
    // -----------------------------------------------------------------------

    pub async fn list_books(&self) -> AppResult<Vec<BookShort>> {
        self.repository.books.list().await
    }

    /// Book with author, language, genres and copies
    pub async fn get_book(&self, id: i32, today: NaiveDate) -> AppResult<BookDetails> {
        self.repository.books.get_details(id, today).await
    }

    pub async fn create_book(&self, book: CreateBook, today: NaiveDate) -> AppResult<BookDetails> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.check_book_references(book.author_id, book.language_id, Some(&book.genre_ids))
            .await?;

        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::Conflict(
                "Book with this ISBN already exists".to_string(),
            ));
        }

        let created = self.repository.books.create(&book).await?;
        self.repository.books.get_details(created.id, today).await
    }

    pub async fn update_book(
        &self,
        id: i32,
        book: UpdateBook,
        today: NaiveDate,
    ) -> AppResult<BookDetails> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository.books.get_by_id(id).await?;

        self.check_book_references(book.author_id, book.language_id, book.genre_ids.as_deref())
            .await?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Book with this ISBN already exists".to_string(),
                ));
            }
        }

        self.repository.books.update(id, &book).await?;
        self.repository.books.get_details(id, today).await
    }

    /// Delete a book. Its copies stay, with the book reference nulled.
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// Reject payloads that point at catalog entries which do not exist
    async fn check_book_references(
        &self,
        author_id: Option<i32>,
        language_id: Option<i32>,
        genre_ids: Option<&[i32]>,
    ) -> AppResult<()> {
        if let Some(author_id) = author_id {
            if !self.repository.authors.exists(author_id).await? {
                return Err(AppError::BadRequest(format!(
                    "Author with id {} does not exist",
                    author_id
                )));
            }
        }

        if let Some(language_id) = language_id {
            if !self.repository.languages.exists(language_id).await? {
                return Err(AppError::BadRequest(format!(
                    "Language with id {} does not exist",
                    language_id
                )));
            }
        }

        if let Some(genre_ids) = genre_ids {
            if let Some(missing) = self.repository.genres.find_missing(genre_ids).await? {
                return Err(AppError::BadRequest(format!(
                    "Genre with id {} does not exist",
                    missing
                )));
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Copies
    // -----------------------------------------------------------------------

    pub async fn list_copies(
        &self,
        status: Option<LoanStatus>,
        today: NaiveDate,
    ) -> AppResult<Vec<CopyDetails>> {
        self.repository.copies.list(status, today).await
    }

    pub async fn get_copy(&self, id: Uuid, today: NaiveDate) -> AppResult<CopyDetails> {
        self.repository.copies.get_details(id, today).await
    }

    pub async fn create_copy(&self, copy: CreateCopy, today: NaiveDate) -> AppResult<CopyDetails> {
        copy.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(book_id) = copy.book_id {
            if !self.repository.books.exists(book_id).await? {
                return Err(AppError::BadRequest(format!(
                    "Book with id {} does not exist",
                    book_id
                )));
            }
        }

        let created = self.repository.copies.create(&copy).await?;
        self.repository.copies.get_details(created.id, today).await
    }

    pub async fn update_copy(
        &self,
        id: Uuid,
        copy: UpdateCopy,
        today: NaiveDate,
    ) -> AppResult<CopyDetails> {
        copy.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository.copies.get_by_id(id).await?;

        if let Some(book_id) = copy.book_id {
            if !self.repository.books.exists(book_id).await? {
                return Err(AppError::BadRequest(format!(
                    "Book with id {} does not exist",
                    book_id
                )));
            }
        }

        self.repository.copies.update(id, &copy).await?;
        self.repository.copies.get_details(id, today).await
    }

    pub async fn delete_copy(&self, id: Uuid) -> AppResult<()> {
        self.repository.copies.delete(id).await
    }
}
