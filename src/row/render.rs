// Projection of a project record into the fields a row displays

use std::path::PathBuf;

use super::env::RowEnv;
use super::favorite::FavoriteVisual;
use crate::models::{GodotVersion, ProjectFile};

pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Which image the icon slot should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// The project file itself is gone.
    Missing,
    /// The project exists but has no usable icon file.
    Default,
    /// Load the image at this path.
    File(PathBuf),
}

/// Snapshot of everything a row shows for its bound record.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDisplay {
    pub name: String,
    pub description: String,
    pub location: String,
    pub favorite: bool,
    pub favorite_visual: FavoriteVisual,
    pub icon: IconSource,
    pub missing_project: bool,
}

impl RowDisplay {
    pub fn project(record: &ProjectFile, env: &RowEnv) -> Self {
        let location = record.location();
        let missing_project = !env.probe.exists(&location);

        let location_label = if missing_project {
            UNKNOWN_LOCATION.to_string()
        } else {
            location
                .parent()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default()
        };

        let icon = if missing_project {
            IconSource::Missing
        } else {
            let path = env.resolver.resolve(&location, &record.icon());
            if env.probe.exists(&path) {
                IconSource::File(path)
            } else {
                IconSource::Default
            }
        };

        let favorite = record.favorite();
        Self {
            name: record.name(),
            description: record.description(),
            location: location_label,
            favorite,
            favorite_visual: FavoriteVisual::for_state(favorite),
            icon,
            missing_project,
        }
    }
}

pub fn version_label(version: Option<&GodotVersion>) -> String {
    match version {
        Some(version) => format!("Godot {}", version.tag()),
        None => UNKNOWN_VERSION.to_string(),
    }
}
