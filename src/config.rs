use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::page::{PageQuery, DEFAULT_PAGE_SIZE, MAXIMUM_PAGE_SIZE};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: i32,
    pub max_page_size: i32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAXIMUM_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Page size a request ends up with: the configured default when nothing
    /// was asked for, otherwise the request clamped into [1, max].
    pub fn effective_size(&self, requested: Option<i32>) -> i32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    pub fn first_page(&self) -> PageQuery {
        PageQuery {
            page_size: self.effective_size(None),
            ..PageQuery::default()
        }
    }
}

impl Config {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(raw)?;
        anyhow::ensure!(
            config.pagination.default_page_size >= 1,
            "pagination.default_page_size must be at least 1"
        );
        anyhow::ensure!(
            config.pagination.max_page_size >= config.pagination.default_page_size,
            "pagination.max_page_size must not undercut the default"
        );
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Loads the file when it exists, otherwise answers the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
