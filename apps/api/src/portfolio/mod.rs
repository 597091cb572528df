//! HTTP boundary for the portfolio aggregate: import, section CRUD,
//! publish, preview, slug validation and custom-domain updates.

pub mod domain;
pub mod handlers;
pub mod repo;
pub mod slug;
