use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

const STYLESHEET_NAME: &str = "style.css";

/// Per-user locations the launcher reads from.
#[derive(Debug, Clone)]
pub struct LauncherPaths {
    config_dir: PathBuf,
}

impl LauncherPaths {
    /// Resolve the XDG locations (`$XDG_CONFIG_HOME/gdlaunch` on Linux).
    pub fn from_env() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "gdlaunch")
            .context("Failed to determine project directories")?;
        Ok(Self::with_config_dir(dirs.config_dir()))
    }

    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// The user stylesheet, if one has been installed.
    pub fn user_stylesheet(&self) -> Option<PathBuf> {
        let path = self.config_dir.join(STYLESHEET_NAME);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_stylesheet_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let paths = LauncherPaths::with_config_dir(dir.path());
        assert_eq!(paths.user_stylesheet(), None);

        std::fs::write(dir.path().join("style.css"), ".project-row {}").unwrap();
        assert_eq!(paths.user_stylesheet(), Some(dir.path().join("style.css")));
    }
}
