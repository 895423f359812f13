//! Observable project record shared between the launcher and its rows.
//!
//! A `ProjectFile` is owned by whatever registry created it and handed to rows
//! as an `Rc`. Rows only read it; mutation goes through the setters here,
//! which announce the change to every subscriber.

use std::cell::{Cell, RefCell};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use super::godot_version::GodotVersion;

/// Handle returned by [`ChangeNotifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change-notification channel of an observable record.
pub trait ChangeNotifier {
    /// Register `callback`; it runs after every mutation of a displayed field.
    fn subscribe(&self, callback: Rc<dyn Fn()>) -> SubscriptionId;

    /// Remove a subscription. Returns `false` when `id` was not registered,
    /// so calling it twice is harmless.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Debug, Error)]
pub enum ProjectFileError {
    #[error("failed to read project file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct ProjectFile {
    name: RefCell<String>,
    description: RefCell<String>,
    location: RefCell<PathBuf>,
    icon: RefCell<String>,
    favorite: Cell<bool>,
    listeners: RefCell<Vec<(SubscriptionId, Rc<dyn Fn()>)>>,
    next_listener: Cell<u64>,
}

impl ProjectFile {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: RefCell::new(name.into()),
            description: RefCell::new(String::new()),
            location: RefCell::new(location.into()),
            icon: RefCell::new(String::new()),
            favorite: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    pub fn with_icon(self, icon: impl Into<String>) -> Self {
        self.icon.replace(icon.into());
        self
    }

    pub fn with_favorite(self, favorite: bool) -> Self {
        self.favorite.set(favorite);
        self
    }

    /// Build a record from a Godot `project.godot` file.
    ///
    /// Only the `[application]` section is read. The engine version is taken
    /// from `config/features` when it names one.
    pub fn load(path: &Path) -> Result<(Self, Option<GodotVersion>), ProjectFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProjectFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = ApplicationSettings::parse(&text);

        let name = settings.name.unwrap_or_else(|| {
            path.parent()
                .and_then(|dir| dir.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("[unnamed]")
                .to_string()
        });
        let version = GodotVersion::from_features(&settings.features);
        debug!(?path, %name, ?version, "Loaded project file");

        let record = Self::new(name, path)
            .with_description(settings.description.unwrap_or_default())
            .with_icon(settings.icon.unwrap_or_default());
        Ok((record, version))
    }

    pub fn name(&self) -> String {
        self.name.borrow().clone()
    }

    pub fn description(&self) -> String {
        self.description.borrow().clone()
    }

    pub fn location(&self) -> PathBuf {
        self.location.borrow().clone()
    }

    pub fn icon(&self) -> String {
        self.icon.borrow().clone()
    }

    pub fn favorite(&self) -> bool {
        self.favorite.get()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        Self::replace_and_notify(self, &self.name, name.into());
    }

    pub fn set_description(&self, description: impl Into<String>) {
        Self::replace_and_notify(self, &self.description, description.into());
    }

    pub fn set_location(&self, location: impl Into<PathBuf>) {
        Self::replace_and_notify(self, &self.location, location.into());
    }

    pub fn set_icon(&self, icon: impl Into<String>) {
        Self::replace_and_notify(self, &self.icon, icon.into());
    }

    pub fn set_favorite(&self, favorite: bool) {
        if self.favorite.replace(favorite) != favorite {
            self.notify();
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn replace_and_notify<T: PartialEq>(&self, cell: &RefCell<T>, value: T) {
        if *cell.borrow() == value {
            return;
        }
        cell.replace(value);
        self.notify();
    }

    fn notify(&self) {
        // Callbacks may subscribe or unsubscribe while we iterate.
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in listeners {
            callback();
        }
    }
}

impl ChangeNotifier for ProjectFile {
    fn subscribe(&self, callback: Rc<dyn Fn()>) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl std::fmt::Debug for ProjectFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectFile")
            .field("name", &*self.name.borrow())
            .field("location", &*self.location.borrow())
            .field("icon", &*self.icon.borrow())
            .field("favorite", &self.favorite.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[derive(Debug, Default)]
struct ApplicationSettings {
    name: Option<String>,
    description: Option<String>,
    icon: Option<String>,
    features: Vec<String>,
}

impl ApplicationSettings {
    fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        let mut in_application = false;

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                in_application = line == "[application]";
                continue;
            }
            if !in_application {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                "config/name" => settings.name = Some(unquote(value.trim())),
                "config/description" => settings.description = Some(unquote(value.trim())),
                "config/icon" => settings.icon = Some(unquote(value.trim())),
                "config/features" => settings.features = quoted_strings(value),
                _ => {}
            }
        }
        settings
    }
}

fn unquote(value: &str) -> String {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Collect every `"..."` literal, e.g. from `PackedStringArray("4.2", "GL Compatibility")`.
fn quoted_strings(value: &str) -> Vec<String> {
    value
        .split('"')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}
