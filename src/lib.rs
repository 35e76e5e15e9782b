pub mod attributes;
pub mod chunked;
pub mod command;
pub mod decode;
pub mod error;
pub mod image;
pub mod plan;
pub mod range;
pub mod restrict;
pub mod segment;

pub use attributes::BootloaderAttributes;
pub use chunked::{ChunkingOptions, chunked};
pub use command::{CommandHeader, FixedHeader};
pub use decode::HexDecoder;
pub use error::Error;
pub use image::FirmwareImage;
pub use plan::{
    Chunk, ChunkGeometry, ChunkPlan, Chunks, ConfigurationError, Filler, Layout, PlanError,
    PlanOptions, plan,
};
pub use range::{MemoryRange, RangeError};
pub use restrict::restrict;
pub use segment::{MemorySegment, SegmentError};
