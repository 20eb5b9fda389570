mod batch;
mod saver;

pub use batch::{convert_directory, ConvertReport};
pub use saver::save_frame_image;
