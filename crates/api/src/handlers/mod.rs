pub mod artist;
pub mod artist_release;
pub mod release;
