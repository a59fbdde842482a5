pub mod error;
pub mod fetcher;
pub mod listing;
pub mod patterns;
pub mod profile;
pub mod stream;
pub mod throttle;

pub use error::{FetchError, ScanError};
pub use fetcher::{Fetcher, VisitedSet};
pub use listing::{CameraDetail, CategoryLink, Listing, ListingBlock};
pub use profile::SiteProfile;
pub use stream::{StreamKind, StreamSource, classify_stream};
pub use throttle::Throttle;
