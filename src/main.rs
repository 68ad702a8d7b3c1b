mod app;
mod ui;

use app::FolioApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folio=info".parse().unwrap()),
        )
        .init();

    let app = FolioApp::new();
    std::process::exit(app.run());
}
