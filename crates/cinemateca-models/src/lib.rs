pub mod genre;
pub mod media;
pub mod media_kind;
pub mod people;
pub mod response;
pub mod trailer;
pub mod wallpaper;
pub mod watch_provider;

pub use genre::GenreEntry;
pub use media::{Media, MediaBase, MediaSummary, Movie, Series};
pub use media_kind::{InvalidMediaKind, MediaKind};
pub use people::{Actor, Creator};
pub use response::ApiResponse;
pub use trailer::Trailer;
pub use wallpaper::{ImageKind, Wallpaper};
pub use watch_provider::{OfferType, WatchProvider};
