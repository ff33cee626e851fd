use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("page size {page_size} cannot produce a page count")]
    InvalidPageSize { page_size: i32 },
    #[error("{entity} has no field `{field}`")]
    UnknownField { entity: &'static str, field: String },
    #[error("order way `{way}` is neither `asc` nor `desc`")]
    InvalidOrderWay { way: String },
    #[error("no {entity} with id {id}")]
    NotFound { entity: &'static str, id: u64 },
    #[error("{entity} id {id} is already taken")]
    IdConflict { entity: &'static str, id: u64 },
    #[error("{entity} has no id yet")]
    MissingId { entity: &'static str },
    #[error("more than one {entity} matched on `{field}`")]
    NonUniqueResult { entity: &'static str, field: String },
}
