// Main window for the folio showcase
// Header bar with the selected project, scrolled page with intro and masonry grid

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, CssProvider, HeaderBar, Label,
    Orientation, PolicyType, ScrolledWindow, Settings, STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::path::Path;
use std::rc::Rc;

use super::card::MAX_BLUR_CLASS;
use super::masonry_view::MasonryView;
use folio::models::ProjectItem;
use folio::ShowcaseOptions;

/// Embedded stylesheet, used when `src/style.css` is absent
const FALLBACK_CSS: &str = r#"
window {
    background-color: #0a0a0a;
    color: #e0e0e0;
}

.intro {
    padding: 48px 40px 24px 40px;
}

.intro-title {
    font-size: 32px;
    font-weight: bold;
}

.intro-blurb {
    color: #9a9a9a;
}

.masonry {
    margin: 0 40px;
}

.project-card {
    background-color: #121212;
    border-radius: 12px;
}

.project-card.broken {
    border: 1px dashed #333333;
}

.project-card.expanded {
    box-shadow: 0 8px 32px rgba(0, 0, 0, 0.6);
}

.card-tint {
    background-color: #00ff88;
}

.card-caption {
    background-image: linear-gradient(to top, rgba(0, 0, 0, 0.8), transparent);
    padding: 16px;
}

.card-title {
    font-weight: bold;
    font-size: 15px;
}

.card-short,
.card-long {
    font-size: 12px;
    color: #cfcfcf;
}

.card-tags {
    font-size: 11px;
    color: #00ff88;
}

.subtitle {
    font-size: 11px;
    color: #9a9a9a;
}
"#;

/// `blur-0` .. `blur-N` classes for card entrance focus.
fn blur_css() -> String {
    (0..=MAX_BLUR_CLASS)
        .map(|radius| {
            format!(
                ".project-card.blur-{} {{ filter: blur({}px); }}\n",
                radius, radius
            )
        })
        .collect()
}

/// Load and apply the stylesheet
fn load_css() {
    let provider = CssProvider::new();

    let css_path = concat!(env!("CARGO_MANIFEST_DIR"), "/src/style.css");
    let base = if Path::new(css_path).exists() {
        match std::fs::read_to_string(css_path) {
            Ok(css) => {
                tracing::info!(path = css_path, "Loaded CSS");
                css
            }
            Err(e) => {
                tracing::warn!(path = css_path, error = %e, "Failed to read CSS, using fallback");
                FALLBACK_CSS.to_string()
            }
        }
    } else {
        tracing::debug!("Loaded fallback embedded CSS");
        FALLBACK_CSS.to_string()
    };
    provider.load_from_string(&format!("{}\n{}", base, blur_css()));

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

const NO_SELECTION_SUBTITLE: &str = "Select a project";

fn selection_subtitle(item: &ProjectItem) -> String {
    match item.category.as_deref() {
        Some(category) => format!("{} · {}", item.display_title(), category),
        None => item.display_title().to_string(),
    }
}

pub struct MainWindow {
    window: ApplicationWindow,
    _view: Rc<MasonryView>,
}

impl MainWindow {
    /// `source` describes where the items came from, shown under the intro.
    pub fn new(
        app: &Application,
        items: Vec<ProjectItem>,
        options: ShowcaseOptions,
        source: &str,
    ) -> Rc<Self> {
        load_css();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title("folio")
            .default_width(1280)
            .default_height(860)
            .build();

        let title_box = GtkBox::new(Orientation::Vertical, 0);
        title_box.set_valign(Align::Center);
        let title = Label::new(Some("folio"));
        title.add_css_class("title");
        let subtitle = Label::new(Some(NO_SELECTION_SUBTITLE));
        subtitle.add_css_class("subtitle");
        title_box.append(&title);
        title_box.append(&subtitle);

        let header = HeaderBar::new();
        header.set_title_widget(Some(&title_box));
        window.set_titlebar(Some(&header));

        let intro = GtkBox::new(Orientation::Vertical, 8);
        intro.add_css_class("intro");
        let intro_title = Label::new(Some("Projects"));
        intro_title.set_halign(Align::Start);
        intro_title.add_css_class("intro-title");
        let category = options.category.clone();
        let blurb_text = match category.as_deref() {
            Some(category) => format!("{} projects in {} · {}", items.len(), category, source),
            None => format!("{} projects · {}", items.len(), source),
        };
        let blurb = Label::new(Some(&blurb_text));
        blurb.set_halign(Align::Start);
        blurb.add_css_class("intro-blurb");
        intro.append(&intro_title);
        intro.append(&blurb);

        let view = MasonryView::new(items, options);
        let page = GtkBox::new(Orientation::Vertical, 0);
        page.append(&intro);
        page.append(view.widget());

        let scrolled = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .child(&page)
            .build();
        view.attach_scroller(&scrolled);
        window.set_child(Some(&scrolled));

        let selected_subtitle = subtitle.clone();
        view.connect_project_selected(move |item| {
            tracing::debug!(item_id = %item.id, "Project selected");
            selected_subtitle.set_text(&selection_subtitle(item));
        });
        view.connect_selection_cleared(move || {
            subtitle.set_text(NO_SELECTION_SUBTITLE);
        });

        Rc::new(Self {
            window,
            _view: view,
        })
    }

    pub fn present(&self) {
        self.window.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_css_covers_card_classes() {
        for class in [".project-card", ".card-tint", ".card-caption", ".masonry"] {
            assert!(FALLBACK_CSS.contains(class), "{}", class);
        }
    }

    #[test]
    fn test_blur_css_has_every_class() {
        let css = blur_css();
        assert!(css.contains(".blur-0 { filter: blur(0px); }"));
        assert!(css.contains(&format!(".blur-{} ", MAX_BLUR_CLASS)));
        assert_eq!(css.lines().count(), MAX_BLUR_CLASS as usize + 1);
    }

    #[test]
    fn test_selection_subtitle() {
        let item = ProjectItem::new("1", "a.jpg", 400.0)
            .with_title("Drone")
            .with_category("Robotics");
        assert_eq!(selection_subtitle(&item), "Drone · Robotics");
        let bare = ProjectItem::new("2", "b.jpg", 400.0).with_title("Site");
        assert_eq!(selection_subtitle(&bare), "Site");
    }
}
