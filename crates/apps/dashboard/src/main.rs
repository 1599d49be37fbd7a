//! UDDHRTI report dashboard
//!
//! This is the main entry point for the dashboard application.

use gpui::prelude::*;
use gpui::{Application, WindowOptions, px, size};
use gpui_component::{Theme, ThemeMode, TitleBar};
use log::{error, info, warn};
use report::{DashboardConfig, HttpBackend, InMemoryBackend, ReportBackend};
use std::sync::Arc;

mod app;
mod components;
mod views;

use app::DashboardApp;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let settings = load_settings();
    let backend = create_backend(&settings);

    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |cx| {
            gpui_component::init(cx);
            Theme::change(ThemeMode::Dark, None, cx);

            let window_options = WindowOptions {
                window_bounds: Some(gpui::WindowBounds::Windowed(gpui::Bounds {
                    origin: gpui::Point::default(),
                    size: size(px(1100.), px(820.)),
                })),
                titlebar: Some(TitleBar::title_bar_options()),
                ..Default::default()
            };

            cx.open_window(window_options, |window, cx| {
                cx.new(|cx| DashboardApp::new(backend.clone(), settings.clone(), window, cx))
            })
            .expect("Failed to open window");

            info!("Dashboard started");
        });
}

/// Load settings, falling back to defaults when the file is unusable
fn load_settings() -> DashboardConfig {
    let settings = match DashboardConfig::load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Using default dashboard settings: {:#}", e);
            DashboardConfig::default()
        }
    };

    match settings.save_if_missing() {
        Ok(Some(path)) => info!("Wrote default settings to {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Could not write default settings: {:#}", e),
    }

    settings
}

/// Build the HTTP backend, or an offline stand-in if the URL is unusable
fn create_backend(settings: &DashboardConfig) -> Arc<dyn ReportBackend> {
    match HttpBackend::from_config(settings) {
        Ok(backend) => {
            info!("Using report backend at {}", backend.base_url());
            Arc::new(backend)
        }
        Err(e) => {
            error!("{}; running against an offline backend", e);
            if let Some(path) = DashboardConfig::default_settings_path() {
                warn!(
                    "To configure the backend, either:\n\
                     1. Set backend_url in: {}\n\
                     2. Or set the environment variable: {}",
                    path.display(),
                    report::config::BACKEND_URL_ENV
                );
            }
            Arc::new(InMemoryBackend::new())
        }
    }
}
