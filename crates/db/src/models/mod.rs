//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for creates and partial updates
//! - Resolved input structs handed to the repositories

pub mod artist;
pub mod release;
