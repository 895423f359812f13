pub mod icons;
pub mod project_list;
pub mod project_row;
pub mod window;

pub use project_row::ProjectRowWidget;
pub use window::MainWindow;
