//! Concrete implementations of the editor ports.

pub mod file_sink;
pub mod list_buffer;
pub mod materials;
pub mod yaml;

pub use file_sink::FileSink;
pub use list_buffer::ListBuffer;
pub use materials::BuiltinMaterials;
pub use yaml::YamlParser;
