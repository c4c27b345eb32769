//! Application services layer.

pub mod categories;
pub mod error;
pub mod listing;
pub mod posts;
pub mod procedures;
pub mod repos;
pub mod site;
