//! Template Service - template cache management.
//!
//! Separated from ScaffoldService for single responsibility.

use std::path::PathBuf;

use tracing::instrument;

use crate::{
    application::ports::{AcquiredTemplate, TemplateSource},
    error::PodsmithResult,
};

/// Service for template operations.
pub struct TemplateService {
    source: Box<dyn TemplateSource>,
}

impl TemplateService {
    pub fn new(source: Box<dyn TemplateSource>) -> Self {
        Self { source }
    }

    /// Re-acquire the template, ignoring the cached copy.
    #[instrument(skip(self))]
    pub fn update(&self) -> PodsmithResult<AcquiredTemplate> {
        self.source.acquire(true)
    }

    /// Cached template directory names.
    pub fn list(&self) -> PodsmithResult<Vec<String>> {
        self.source.list_cached()
    }

    pub fn location(&self) -> PathBuf {
        self.source.cache_dir()
    }
}
