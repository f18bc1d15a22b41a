//! Data models for Book Manager

pub mod book;

pub use book::{Book, BookFields, BookRequest};
