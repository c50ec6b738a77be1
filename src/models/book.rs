//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::Author;
use super::copy::CopyDetails;
use super::genre::Genre;
use super::language::Language;

/// Number of genre names shown on summary lines
const GENRE_DISPLAY_LIMIT: usize = 3;

/// Abbreviated genre line: the first few genre names joined with commas
pub fn genre_summary(names: &[String]) -> String {
    names
        .iter()
        .take(GENRE_DISPLAY_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
}

/// Compact book representation for list views and author pages
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub author: Option<String>,
    pub language: Option<String>,
}

/// Book with its author, language, genres and copies
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<Author>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    pub genre_display: String,
    pub copies: Vec<CopyDetails>,
}

impl BookDetails {
    pub fn from_parts(
        book: Book,
        author: Option<Author>,
        language: Option<Language>,
        genres: Vec<Genre>,
        copies: Vec<CopyDetails>,
    ) -> Self {
        let names: Vec<String> = genres.iter().map(|g| g.name.clone()).collect();
        Self {
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            genre_display: genre_summary(&names),
            copies,
        }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: String,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: String,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Update book request. Absent fields keep their current value;
/// `genre_ids` replaces the whole genre set when present.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: Option<String>,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
    pub genre_ids: Option<Vec<i32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn genre_summary_joins_with_commas() {
        let g = names(&["Fantasy", "Poetry"]);
        assert_eq!(genre_summary(&g), "Fantasy, Poetry");
    }

    #[test]
    fn genre_summary_caps_at_three_names() {
        let g = names(&["Fantasy", "Poetry", "Drama", "Essay"]);
        assert_eq!(genre_summary(&g), "Fantasy, Poetry, Drama");
    }

    #[test]
    fn genre_summary_empty_list() {
        assert_eq!(genre_summary(&[]), "");
    }
}
