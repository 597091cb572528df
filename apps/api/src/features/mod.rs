//! Feature-request voting.

pub mod votes;
