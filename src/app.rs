use gtk4::prelude::*;
use gtk4::Application;
use std::path::PathBuf;

use crate::ui::MainWindow;
use folio::models::{Catalog, ProjectItem, ScanConfig};
use folio::ShowcaseOptions;

const APP_ID: &str = "io.folio.Showcase";

pub struct FolioApp {
    app: Application,
}

impl FolioApp {
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
        let options = ShowcaseOptions::load_default();
        let root = options.resolved_image_root();
        let catalog = Catalog::builtin(&root);
        let source = format!("images from {}", root.display());
        Self::show(app, &catalog, options, &source);
    }

    fn on_open(app: &Application, files: &[gio::File], _hint: &str) {
        let Some(dir) = files.first().and_then(|f| f.path()) else {
            Self::on_activate(app);
            return;
        };

        // Probing image headers can take a while on large folders.
        let (tx, rx) = async_channel::bounded::<(PathBuf, anyhow::Result<Catalog>)>(1);
        std::thread::spawn(move || {
            let scanned = Catalog::from_directory(&dir, &ScanConfig::default());
            let _ = tx.send_blocking((dir, scanned));
        });

        let app = app.clone();
        // Hold the application open while the scan runs.
        let hold = app.hold();
        glib::spawn_future_local(async move {
            let _hold = hold;
            let Ok((dir, scanned)) = rx.recv().await else {
                return;
            };
            match scanned {
                Ok(catalog) => {
                    let source = format!("{}", dir.display());
                    Self::show(&app, &catalog, ShowcaseOptions::load_default(), &source);
                }
                Err(e) => {
                    tracing::warn!(path = %dir.display(), error = ?e, "Failed to scan directory, showing built-in projects");
                    Self::on_activate(&app);
                }
            }
        });
    }

    fn show(app: &Application, catalog: &Catalog, options: ShowcaseOptions, source: &str) {
        let items = filter_items(catalog, options.category.as_deref());
        let window = MainWindow::new(app, items, options, source);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}

impl Default for FolioApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the category filter; an unknown category shows everything.
fn filter_items(catalog: &Catalog, category: Option<&str>) -> Vec<ProjectItem> {
    let items = catalog.filtered(category);
    if items.is_empty() && !catalog.is_empty() {
        tracing::warn!(
            category = category.unwrap_or_default(),
            available = ?catalog.categories(),
            "No projects in category, showing all"
        );
        return catalog.filtered(None);
    }
    items
}
