use gtk4::prelude::*;
use gtk4::{gio, Application};
use std::path::PathBuf;
use std::rc::Rc;

use crate::ui::MainWindow;

const APP_ID: &str = "com.gdlaunch.ProjectLauncher";

pub struct LauncherApp {
    app: Application,
}

impl LauncherApp {
    pub fn new() -> Self {
        let app = Application::builder()
            .application_id(APP_ID)
            .flags(gio::ApplicationFlags::HANDLES_OPEN)
            .build();

        app.connect_activate(Self::on_activate);
        app.connect_open(Self::on_open);

        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        let window = MainWindow::new(app, &[]);
        window.present();
        Self::keep_window(app, window);
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let paths: Vec<PathBuf> = files.iter().filter_map(|f| f.path()).collect();
        let paths: Vec<&std::path::Path> = paths.iter().map(PathBuf::as_path).collect();
        let window = MainWindow::new(app, &paths);
        window.present();
        Self::keep_window(app, window);
    }

    // Keep the window alive by storing it on the Application. GTK only holds
    // the widgets; row events reach MainWindow through a weak reference.
    fn keep_window(app: &Application, window: Rc<MainWindow>) {
        // The key is never read back, so no mismatched type can be fetched.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}

impl Default for LauncherApp {
    fn default() -> Self {
        Self::new()
    }
}
