mod card;
mod masonry_view;
mod window;

pub use window::MainWindow;
