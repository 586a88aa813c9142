pub use crate::error::MapError;
#[cfg(feature = "future")]
pub use crate::future::{ParMapFuture, ParallelMapFuture};
pub use crate::mapper::{ParallelMapper, ParallelMapperBuilder};
#[cfg(feature = "slice")]
pub use crate::slice::ParallelMap;
