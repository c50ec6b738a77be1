//! Domain models

pub mod author;
pub mod book;
pub mod copy;
pub mod genre;
pub mod language;

pub use author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor};
pub use book::{Book, BookDetails, BookShort, CreateBook, UpdateBook};
pub use copy::{
    BookCopy, CopyDetails, CopyQuery, CopyRow, CreateCopy, LoanStatus, RenewCopy, RenewalProposal,
    UpdateCopy,
};
pub use genre::{CreateGenre, Genre, UpdateGenre};
pub use language::{CreateLanguage, Language, UpdateLanguage};
