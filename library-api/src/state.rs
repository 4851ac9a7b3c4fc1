//! Application state shared across handlers

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    config::Config,
    error::Result,
    handlers::LinkBuilder,
    mapping::{library_registry, PropertyMappingRegistry},
};

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// State handed to every handler through axum's `State` extractor
///
/// Everything in here is built once at startup and only read afterwards;
/// the repository does its own locking.
pub struct LibraryState<R> {
    config: Arc<Config>,
    repository: Arc<R>,
    mappings: Arc<PropertyMappingRegistry>,
    links: LinkBuilder,
    today: fn() -> NaiveDate,
}

impl<R> Clone for LibraryState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            repository: Arc::clone(&self.repository),
            mappings: Arc::clone(&self.mappings),
            links: self.links.clone(),
            today: self.today,
        }
    }
}

impl<R> LibraryState<R> {
    /// Validate `config` and build the state around `repository`
    ///
    /// Fails if the configuration is invalid or the sort mapping tables
    /// cannot be registered.
    pub fn new(config: Config, repository: R) -> Result<Self> {
        config.validate()?;
        let links = LinkBuilder::from_config(&config.links)?;
        let mappings = library_registry()?;

        tracing::debug!(
            service = %config.service.name,
            base_url = %config.links.base_url,
            "Library state ready"
        );

        Ok(Self {
            config: Arc::new(config),
            repository: Arc::new(repository),
            mappings: Arc::new(mappings),
            links,
            today: utc_today,
        })
    }

    /// Use `today` instead of the system clock when working out ages
    #[must_use]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn mappings(&self) -> &PropertyMappingRegistry {
        &self.mappings
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// The date ages are computed at
    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }
}
