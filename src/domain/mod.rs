//! Domain layer types and invariants.

pub mod blocks;
pub mod entities;
pub mod slug;
pub mod validation;
