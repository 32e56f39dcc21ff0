//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod artist_repo;
pub mod release_repo;

pub use artist_repo::ArtistRepo;
pub use release_repo::ReleaseRepo;
