// File-system collaborators injected into a project row

use std::path::{Path, PathBuf};
use std::rc::Rc;

const RESOURCE_SCHEME: &str = "res://";

/// Answers whether a path exists.
pub trait FileProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Resolves a project resource path (such as `res://icon.svg`) to a file
/// on disk, relative to the project's location.
pub trait ResourceResolver {
    fn resolve(&self, location: &Path, resource: &str) -> PathBuf;
}

/// Probe backed by the real file system. Only regular files count.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        !path.as_os_str().is_empty() && path.is_file()
    }
}

/// Godot-style resolution: `res://` paths and relative paths are joined to the
/// directory containing the project file, absolute paths pass through.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResPathResolver;

impl ResourceResolver for ResPathResolver {
    fn resolve(&self, location: &Path, resource: &str) -> PathBuf {
        let base = location.parent().unwrap_or(Path::new(""));
        match resource.strip_prefix(RESOURCE_SCHEME) {
            Some(relative) => base.join(relative),
            None => base.join(resource),
        }
    }
}

/// Collaborators a row needs to render.
#[derive(Clone)]
pub struct RowEnv {
    pub probe: Rc<dyn FileProbe>,
    pub resolver: Rc<dyn ResourceResolver>,
}

impl RowEnv {
    pub fn new(probe: Rc<dyn FileProbe>, resolver: Rc<dyn ResourceResolver>) -> Self {
        Self { probe, resolver }
    }
}

impl Default for RowEnv {
    fn default() -> Self {
        Self::new(Rc::new(FsProbe), Rc::new(ResPathResolver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_resource_paths() {
        let resolver = ResPathResolver;
        let location = Path::new("/home/me/games/demo/project.godot");

        assert_eq!(
            resolver.resolve(location, "res://icon.svg"),
            PathBuf::from("/home/me/games/demo/icon.svg")
        );
        assert_eq!(
            resolver.resolve(location, "res://art/logo.png"),
            PathBuf::from("/home/me/games/demo/art/logo.png")
        );
        assert_eq!(
            resolver.resolve(location, "icon.png"),
            PathBuf::from("/home/me/games/demo/icon.png")
        );
        assert_eq!(
            resolver.resolve(location, "/opt/icons/demo.png"),
            PathBuf::from("/opt/icons/demo.png")
        );
        assert_eq!(resolver.resolve(location, ""), PathBuf::from("/home/me/games/demo"));
    }

    #[test]
    fn test_fs_probe_only_accepts_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("project.godot");
        std::fs::write(&file, "").unwrap();

        assert!(FsProbe.exists(&file));
        assert!(!FsProbe.exists(dir.path()));
        assert!(!FsProbe.exists(&dir.path().join("missing.godot")));
        assert!(!FsProbe.exists(Path::new("")));
    }
}
