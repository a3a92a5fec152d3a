//! Curator core library — record types, corpus loading, errors.
//!
//! - [`types`] — the learning-resource record and its enums
//! - [`error`] — [`CorpusError`]
//! - [`corpus`] — enumerate / load / scaffold record files

pub mod corpus;
pub mod error;
pub mod types;

pub use corpus::CorpusFile;
pub use error::CorpusError;
pub use types::{
    normalize_url, Introducer, Links, Pricing, Record, RecordName, ResourceType, Style,
};
