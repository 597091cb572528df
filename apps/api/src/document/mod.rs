//! The portfolio document model: section schema, the pure document store
//! and its transition function, the resume import builder, and the
//! persistence sync path.

pub mod import;
pub mod schema;
pub mod store;
pub mod sync;
