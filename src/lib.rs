//! Paged access to typed records: a [`Page`] value that carries one slice of
//! a result set plus the arithmetic to navigate it, backed by an in-memory
//! [`Store`] with the usual save/find/delete surface.

pub mod config;
pub mod domain;
pub mod error;
pub mod page;
pub mod service;
pub mod store;

pub use error::{Error, Result};
pub use page::{
    OrderWay, Page, PageQuery, PageQueryBuilder, ASC, DEFAULT_PAGE_SIZE, DESC, MAXIMUM_PAGE_SIZE,
    PAGE_COUNT_UNKNOWN,
};
pub use store::{Entity, FieldValue, Store};
