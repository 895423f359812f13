mod app;
mod config;
mod image_loader;
mod models;
mod row;
mod ui;

use app::LauncherApp;

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "gdlaunch=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = LauncherApp::new();
    std::process::exit(app.run());
}
