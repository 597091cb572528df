//! Payment-processor integration: the post-checkout callback and the
//! signed subscription webhook.

pub mod callback;
pub mod repo;
pub mod webhook;
