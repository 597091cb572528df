pub mod billing;
pub mod feature;
pub mod portfolio;
