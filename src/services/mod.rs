//! Business logic services

pub mod books;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            repository,
        }
    }

    /// Repository shared by the services, for health probes
    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}
