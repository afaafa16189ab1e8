pub mod cache;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod local;
pub mod memory;
pub mod registry;
pub mod source;
pub mod types;

pub use cache::{Cache, CachedSource, DiskCache, MemoryCache, NoCache};
pub use coordinator::{ListingCoordinator, ListingSnapshot};
pub use error::{Result, SourceError};
pub use http::HttpSource;
pub use local::LocalDirSource;
pub use memory::MemorySource;
pub use registry::SourceRegistry;
pub use source::FileSource;
pub use types::FileRecord;
