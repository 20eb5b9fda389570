mod loader;
mod sensor;

pub use loader::{Config, HeaderConfig, OutputConfig, SequenceOrder, TimestampConfig};
pub use sensor::SensorConfig;
