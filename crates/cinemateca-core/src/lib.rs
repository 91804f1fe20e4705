pub mod aggregate;
pub mod credits;
pub mod error;
pub mod genres;
pub mod images;
pub mod normalize;
pub mod providers;
pub mod resolver;

pub use aggregate::{AggregateReport, CatalogService, ServiceSettings};
pub use error::{CatalogError, PartialUpstreamFailure};
pub use genres::{canonical_name, convert_genre_id, convert_genre_id_for, genre_id, genre_id_for};
pub use images::{ImageResolver, ImageSize};
pub use normalize::{normalize_media, normalize_summary, NormalizeContext, SubResources};
pub use providers::{dedupe, providers_for_region};
pub use resolver::{FieldSpec, RawRecord, UpstreamShape};
