pub mod error;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use tmdb::TmdbClient;
pub use traits::{CatalogSource, SubResource};
