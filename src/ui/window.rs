// Main launcher window
// Hosts the project list and reacts to the events its rows raise

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, Label, Orientation,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::path::Path;
use std::rc::Rc;

use super::project_list::ProjectListView;
use super::project_row::{saturation_css, ProjectRowWidget};
use crate::config::LauncherPaths;
use crate::models::ProjectFile;
use crate::row::RowEvent;

const FALLBACK_CSS: &str = r#"
.project-row {
    padding: 8px 12px;
}

.project-row.tinted {
    background-color: alpha(@accent_bg_color, 0.15);
}

.project-row.missing .project-name {
    color: #e04f4f;
}

.project-name {
    font-weight: bold;
    font-size: 14px;
}

.project-description,
.project-location {
    font-size: 11px;
    opacity: 0.7;
}

.project-version {
    font-family: monospace;
    font-size: 11px;
}

.favorite-heart {
    color: #808080;
}

.favorite-heart.favorited {
    color: #ff4d6d;
}
"#;

/// Load the user stylesheet if there is one, the embedded one otherwise.
fn load_css() {
    let provider = CssProvider::new();

    let user_css = match LauncherPaths::from_env() {
        Ok(paths) => paths.user_stylesheet(),
        Err(err) => {
            tracing::warn!(error = ?err, "Failed to resolve config directory");
            None
        }
    };

    match user_css {
        Some(path) => {
            provider.load_from_path(&path);
            tracing::info!("Loaded CSS from: {}", path.display());
        }
        None => {
            provider.load_from_string(FALLBACK_CSS);
            tracing::info!("Loaded fallback embedded CSS");
        }
    }

    // Heart saturation levels apply under any stylesheet.
    let saturation = CssProvider::new();
    saturation.load_from_string(&saturation_css());

    if let Some(display) = Display::default() {
        for provider in [&provider, &saturation] {
            gtk4::style_context_add_provider_for_display(
                &display,
                provider,
                STYLE_PROVIDER_PRIORITY_APPLICATION,
            );
        }
    }
}

pub struct MainWindow {
    window: ApplicationWindow,
    list: ProjectListView,
    status: Label,
}

impl MainWindow {
    pub fn new(app: &Application, project_files: &[&Path]) -> Rc<Self> {
        load_css();

        let list = ProjectListView::new();
        let status = Label::new(None);
        status.set_halign(Align::Start);
        status.set_margin_start(12);
        status.set_margin_end(12);
        status.set_margin_top(4);
        status.set_margin_bottom(4);
        status.add_css_class("status");

        let content = GtkBox::new(Orientation::Vertical, 0);
        content.append(list.widget());
        content.append(&status);

        let window = ApplicationWindow::builder()
            .application(app)
            .title("Godot Projects")
            .default_width(720)
            .default_height(480)
            .child(&content)
            .build();

        let main_window = Rc::new(Self {
            window,
            list,
            status,
        });

        let weak = Rc::downgrade(&main_window);
        main_window.list.connect_row_event(move |row, record, event| {
            if let Some(main_window) = weak.upgrade() {
                main_window.on_row_event(row, record, event);
            }
        });

        for path in project_files {
            main_window.open_project(path);
        }
        main_window.update_status_for_count();
        main_window
    }

    pub fn present(&self) {
        self.window.present();
    }

    pub fn open_project(&self, path: &Path) {
        match ProjectFile::load(path) {
            Ok((record, version)) => {
                tracing::info!("Opened project: {}", path.display());
                self.list.push(Rc::new(record), version);
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Failed to open project");
            }
        }
    }

    pub fn set_status(&self, status: &str) {
        self.status.set_text(status);
    }

    fn update_status_for_count(&self) {
        let count = self.list.project_count();
        self.set_status(&format!("{count} project(s)"));
    }

    fn on_row_event(&self, row: &ProjectRowWidget, record: &Rc<ProjectFile>, event: RowEvent) {
        let name = record.name();
        match event {
            RowEvent::FavoriteClicked(favorite) => {
                // The row only reports the toggle; the record is the source of truth.
                record.set_favorite(favorite);
                tracing::info!(%name, favorite, "Favorite toggled");
            }
            RowEvent::Clicked => {
                row.set_tinted(true);
                row.refresh();
                if row.missing_project() {
                    self.set_status(&format!("{name}: project file is missing"));
                } else {
                    self.set_status(&name);
                }
            }
            RowEvent::DoubleClicked => {
                tracing::info!(%name, location = ?record.location(), "Open requested");
                self.set_status(&format!("Open {name}"));
            }
            RowEvent::RightClicked | RowEvent::RightDoubleClicked => {
                self.set_status(&format!("Options for {name}"));
            }
            RowEvent::DragStarted | RowEvent::DragEnded => {
                tracing::debug!(%name, ?event, "Drag event");
            }
        }
    }
}
