#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Reconstructs per-vessel AIS tracks from irregularly sampled position reports and answers
//! point-in-time queries against them.
//!
//! Everything in this crate is synchronous and free of I/O. A [TrackIndex] is immutable once
//! built and can be shared read-only between any number of concurrent queries.

mod cache;
mod classifier;
mod domain;
mod error;
mod normalizer;
mod path;
mod resolver;
mod subarea;
mod timeline;
mod track_index;

pub use cache::*;
pub use classifier::*;
pub use domain::*;
pub use error::*;
pub use normalizer::*;
pub use path::*;
pub use resolver::*;
pub use subarea::*;
pub use timeline::*;
pub use track_index::*;
