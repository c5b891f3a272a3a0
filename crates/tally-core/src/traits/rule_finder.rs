use std::sync::Arc;

use crate::errors::StorageError;
use crate::models::Rule;

/// Looks up a rule by repository and key.
pub trait RuleFinder {
    fn find_by_key(&self, repository: &str, key: &str) -> Result<Option<Rule>, StorageError>;
}

impl<T: RuleFinder + ?Sized> RuleFinder for &T {
    fn find_by_key(&self, repository: &str, key: &str) -> Result<Option<Rule>, StorageError> {
        (**self).find_by_key(repository, key)
    }
}

impl<T: RuleFinder + ?Sized> RuleFinder for Arc<T> {
    fn find_by_key(&self, repository: &str, key: &str) -> Result<Option<Rule>, StorageError> {
        (**self).find_by_key(repository, key)
    }
}
