//! Stream descriptor generation.
//!
//! A descriptor is a `.strm` text file whose whole content is the URL a media
//! server should stream from. The tree of descriptors under the configured
//! save directory mirrors the remote AList tree.

pub mod codec;
mod generator;
mod result;

pub use codec::PathCodec;
pub use generator::StrmGenerator;
pub use result::{GenerationCounts, GenerationResult};
