//! Application services for MovieAtlas.

pub mod discover;
pub mod tmdb;

pub use discover::MoodCatalog;
pub use tmdb::TmdbClient;
