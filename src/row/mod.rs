//! Toolkit-independent core of the project row: binding to an observable
//! record, projecting it into display fields, and classifying input.

pub mod binding;
pub mod env;
pub mod favorite;
pub mod input;
pub mod render;

pub use binding::{ProjectRow, RowView};
pub use env::RowEnv;
pub use favorite::{FavoriteVisual, SATURATION_STEPS};
pub use input::{InputEvent, PointerEvent, RowEvent};
pub use render::{IconSource, RowDisplay};
