// Project card widget
// Overlay of the cover picture, a hover tint and the caption labels

use gtk4::prelude::*;
use gtk4::{gdk, glib, Align, Box as GtkBox, ContentFit, Label, Orientation, Overlay, Picture};
use std::cell::Cell;

use folio::animation::Frame;
use folio::image_loader::DecodedImage;
use folio::models::ProjectItem;

/// Blur radii are rendered through `blur-N` CSS classes.
pub const MAX_BLUR_CLASS: u32 = 10;

static PLACEHOLDER_RGBA: [u8; 4] = [0x2a, 0x2a, 0x2a, 0xff];

pub struct ProjectCard {
    root: Overlay,
    picture: Picture,
    tint: GtkBox,
    long_text: Label,
    tags: Label,
    blur_class: Cell<u32>,
}

impl ProjectCard {
    pub fn new(item: &ProjectItem) -> Self {
        let picture = Picture::new();
        picture.set_can_shrink(true);
        picture.set_content_fit(ContentFit::Cover);
        picture.add_css_class("card-image");

        let root = Overlay::new();
        root.set_child(Some(&picture));
        root.set_overflow(gtk4::Overflow::Hidden);
        root.add_css_class("project-card");
        root.add_css_class("blur-0");

        let tint = GtkBox::new(Orientation::Vertical, 0);
        tint.add_css_class("card-tint");
        tint.set_can_target(false);
        tint.set_opacity(0.0);
        root.add_overlay(&tint);

        let caption = GtkBox::new(Orientation::Vertical, 2);
        caption.add_css_class("card-caption");
        caption.set_valign(Align::End);
        caption.set_can_target(false);

        let title = Label::new(Some(item.display_title()));
        title.set_halign(Align::Start);
        title.add_css_class("card-title");
        title.set_ellipsize(gtk4::pango::EllipsizeMode::End);
        caption.append(&title);

        if let Some(summary) = item.summary() {
            let short_text = Label::new(Some(summary));
            short_text.set_halign(Align::Start);
            short_text.set_wrap(true);
            short_text.add_css_class("card-short");
            caption.append(&short_text);
        }

        let long_text = Label::new(item.long_text.as_deref());
        long_text.set_halign(Align::Start);
        long_text.set_wrap(true);
        long_text.add_css_class("card-long");
        long_text.set_visible(false);
        caption.append(&long_text);

        let tags = Label::new(Some(&item.technologies.join(" / ")));
        tags.set_halign(Align::Start);
        tags.add_css_class("card-tags");
        tags.set_visible(false);
        caption.append(&tags);

        root.add_overlay(&caption);

        Self {
            root,
            picture,
            tint,
            long_text,
            tags,
            blur_class: Cell::new(0),
        }
    }

    pub fn widget(&self) -> &Overlay {
        &self.root
    }

    /// Show the decoded image, or the placeholder when it failed to load.
    pub fn set_image(&self, image: Option<&DecodedImage>) {
        let texture = image
            .and_then(texture_from_decoded)
            .unwrap_or_else(placeholder_texture);
        self.picture.set_paintable(Some(&texture));
        if image.is_none() {
            self.root.add_css_class("broken");
        }
    }

    pub fn set_expanded(&self, expanded: bool) {
        let has_long = !self.long_text.text().is_empty();
        let has_tags = !self.tags.text().is_empty();
        self.long_text.set_visible(expanded && has_long);
        self.tags.set_visible(expanded && has_tags);
        if expanded {
            self.root.add_css_class("expanded");
        } else {
            self.root.remove_css_class("expanded");
        }
    }

    /// Apply everything in `frame` except placement, which the container owns.
    pub fn apply_frame(&self, frame: &Frame) {
        self.root.set_opacity(frame.opacity.clamp(0.0, 1.0) as f64);
        self.tint.set_opacity(frame.overlay.clamp(0.0, 1.0) as f64);

        let blur = blur_class_for(frame.blur);
        let previous = self.blur_class.replace(blur);
        if previous != blur {
            self.root.remove_css_class(&format!("blur-{}", previous));
            self.root.add_css_class(&format!("blur-{}", blur));
        }
    }
}

/// Quantise a blur radius to one of the `blur-N` classes.
pub fn blur_class_for(radius: f32) -> u32 {
    if !radius.is_finite() || radius <= 0.0 {
        return 0;
    }
    (radius.round() as u32).min(MAX_BLUR_CLASS)
}

fn texture_from_decoded(image: &DecodedImage) -> Option<gdk::Texture> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return None;
    }
    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if image.rgba.len() < expected {
        tracing::warn!(
            bytes = image.rgba.len(),
            width,
            height,
            "Skipping texture: data too small"
        );
        return None;
    }
    let bytes = glib::Bytes::from(&image.rgba[..expected]);
    let texture = gdk::MemoryTexture::new(
        width as i32,
        height as i32,
        gdk::MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

fn placeholder_texture() -> gdk::Texture {
    let bytes = glib::Bytes::from_static(&PLACEHOLDER_RGBA);
    gdk::MemoryTexture::new(1, 1, gdk::MemoryFormat::R8g8b8a8, &bytes, 4).upcast()
}
