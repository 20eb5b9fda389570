mod header;
mod index;
mod reader;
mod writer;

pub use header::{ContainerFrameHeader, HeaderBuilder, HEADER_LEN, TAG_LEN};
pub use index::{index_path, save_container_index};
pub use reader::{ContainerFrame, ContainerReader};
pub use writer::{ContainerWriter, FrameRecord, WriteReport};
