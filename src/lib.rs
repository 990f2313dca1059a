//! Validate, normalize and merge gene annotation and differential expression tables

pub mod annotations;
pub mod counts;
pub mod error;
pub mod loader;
pub mod merge;
pub mod pipeline;
pub mod shape;
pub mod types;
