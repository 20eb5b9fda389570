mod decoder;
mod types;

pub use decoder::FrameDecoder;
pub use types::{BitDepth, PixelGrid, RawFrame};
