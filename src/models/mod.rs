pub mod godot_version;
pub mod project_file;

pub use godot_version::*;
pub use project_file::*;
