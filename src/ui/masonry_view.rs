// Masonry view for the project showcase
// Fixed container whose children are placed every frame from the showcase's animation frames

use gtk4::graphene;
use gtk4::prelude::*;
use gtk4::{EventControllerMotion, EventSequenceState, Fixed, GestureClick, ScrolledWindow};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Instant;

use super::card::ProjectCard;
use folio::animation::{Frame, Viewport};
use folio::models::ProjectItem;
use folio::observe::{visible_fraction, Size, SizeObservers, VisibilityGate};
use folio::preload::{self, PreloadReport, PREVIEW_EDGE};
use folio::{Showcase, ShowcaseOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Measured {
    Window,
    Grid,
}

pub struct MasonryView {
    self_weak: RefCell<Weak<MasonryView>>,
    fixed: Fixed,
    showcase: RefCell<Showcase>,
    cards: RefCell<HashMap<String, ProjectCard>>,
    observers: SizeObservers<Measured>,
    gate: RefCell<VisibilityGate>,
    scroller: RefCell<Option<ScrolledWindow>>,
    /// Placement is stale even if nothing animates (repack, hover, mount).
    needs_frame: Cell<bool>,
    last_height_request: Cell<i32>,
}

impl MasonryView {
    pub fn new(items: Vec<ProjectItem>, options: ShowcaseOptions) -> Rc<Self> {
        let fixed = Fixed::new();
        fixed.set_hexpand(true);
        fixed.set_overflow(gtk4::Overflow::Hidden);
        fixed.add_css_class("masonry");

        let showcase = Showcase::new(items, options);
        let min_height = showcase.grid().container_height.round() as i32;
        fixed.set_size_request(-1, min_height);

        let view = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            fixed,
            showcase: RefCell::new(showcase),
            cards: RefCell::new(HashMap::new()),
            observers: SizeObservers::new(),
            gate: RefCell::new(VisibilityGate::default()),
            scroller: RefCell::new(None),
            needs_frame: Cell::new(false),
            last_height_request: Cell::new(min_height),
        });
        *view.self_weak.borrow_mut() = Rc::downgrade(&view);

        view.setup_size_observers();
        view.setup_background_click();
        view.setup_tick();
        view
    }

    pub fn widget(&self) -> &Fixed {
        &self.fixed
    }

    /// The scrolled page the grid lives in, used for the mount gate.
    pub fn attach_scroller(&self, scroller: &ScrolledWindow) {
        *self.scroller.borrow_mut() = Some(scroller.clone());
    }

    pub fn connect_project_selected<F>(&self, callback: F)
    where
        F: Fn(&ProjectItem) + 'static,
    {
        self.showcase.borrow_mut().on_project_selected(callback);
    }

    pub fn connect_selection_cleared<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.showcase.borrow_mut().on_selection_cleared(callback);
    }

    fn setup_size_observers(&self) {
        let weak_self = self.self_weak.borrow().clone();
        self.observers.observe(Measured::Window, move |size| {
            if let Some(view) = weak_self.upgrade() {
                let viewport = Viewport::new(size.width, size.height);
                view.showcase.borrow_mut().set_viewport(viewport, Instant::now());
                view.after_repack();
            }
        });

        let weak_self = self.self_weak.borrow().clone();
        self.observers.observe(Measured::Grid, move |size| {
            if let Some(view) = weak_self.upgrade() {
                view.showcase
                    .borrow_mut()
                    .set_container_width(size.width, Instant::now());
                view.after_repack();
            }
        });
    }

    fn setup_background_click(&self) {
        let weak_self = self.self_weak.borrow().clone();
        let click = GestureClick::new();
        click.set_button(1);
        click.connect_pressed(move |_, _n, _x, _y| {
            if let Some(view) = weak_self.upgrade() {
                view.showcase.borrow_mut().click_background(Instant::now());
                view.after_repack();
            }
        });
        self.fixed.add_controller(click);
    }

    fn setup_tick(&self) {
        let weak_self = self.self_weak.borrow().clone();
        self.fixed.add_tick_callback(move |fixed, _clock| {
            let Some(view) = weak_self.upgrade() else {
                return glib::ControlFlow::Break;
            };

            if let Some(root) = fixed.root() {
                let window = root.upcast_ref::<gtk4::Widget>();
                view.observers.notify(
                    &Measured::Window,
                    Size::new(window.width() as f32, window.height() as f32),
                );
            }
            let width = fixed.width();
            if width > 0 {
                view.observers
                    .notify(&Measured::Grid, Size::new(width as f32, 0.0));
            }

            view.check_visibility();

            let now = Instant::now();
            if view.needs_frame.replace(false) || view.showcase.borrow().is_animating(now) {
                view.apply_frames(now);
            }
            glib::ControlFlow::Continue
        });
    }

    fn check_visibility(&self) {
        if self.gate.borrow().is_open() {
            return;
        }
        let scroller = self.scroller.borrow();
        let Some(scroller) = scroller.as_ref() else {
            return;
        };
        let Some(top) = self
            .fixed
            .compute_point(scroller, &graphene::Point::new(0.0, 0.0))
        else {
            return;
        };
        let fraction = visible_fraction(
            top.y(),
            self.fixed.height() as f32,
            0.0,
            scroller.height() as f32,
        );
        if self.gate.borrow_mut().update(fraction) {
            tracing::info!(fraction, "Showcase visible, preloading images");
            self.start_preload();
        }
    }

    fn start_preload(&self) {
        let paths = self
            .showcase
            .borrow()
            .items()
            .iter()
            .map(|item| item.image.clone())
            .collect();
        let receiver = preload::spawn_preload(paths, PREVIEW_EDGE);

        let weak_self = self.self_weak.borrow().clone();
        glib::spawn_future_local(async move {
            match receiver.recv().await {
                Ok(report) => {
                    if let Some(view) = weak_self.upgrade() {
                        view.mount(report);
                    }
                }
                Err(_) => tracing::warn!("Preload finished without a report"),
            }
        });
    }

    /// Create a card for every item and hand the settled images to the showcase.
    fn mount(&self, report: PreloadReport) {
        {
            let showcase = self.showcase.borrow();
            let mut cards = self.cards.borrow_mut();
            for item in showcase.items() {
                let card = ProjectCard::new(item);
                card.set_image(report.image(&item.image));
                card.widget().set_opacity(0.0);
                self.attach_card_controllers(&card, &item.id);
                self.fixed.put(card.widget(), 0.0, 0.0);
                cards.insert(item.id.clone(), card);
            }
        }
        self.showcase
            .borrow_mut()
            .images_ready(report, Instant::now());
        self.after_repack();
    }

    fn attach_card_controllers(&self, card: &ProjectCard, id: &str) {
        let weak_self = self.self_weak.borrow().clone();
        let item_id = id.to_string();
        let click = GestureClick::new();
        click.set_button(1);
        click.connect_pressed(move |gesture, _n, _x, _y| {
            // Keep the background gesture from collapsing right after.
            gesture.set_state(EventSequenceState::Claimed);
            if let Some(view) = weak_self.upgrade() {
                view.showcase
                    .borrow_mut()
                    .click_item(&item_id, Instant::now());
                view.after_repack();
            }
        });
        card.widget().add_controller(click);

        let motion = EventControllerMotion::new();
        let weak_self = self.self_weak.borrow().clone();
        let item_id = id.to_string();
        motion.connect_enter(move |_, _x, _y| {
            if let Some(view) = weak_self.upgrade() {
                view.showcase
                    .borrow_mut()
                    .hover_enter(&item_id, Instant::now());
                view.needs_frame.set(true);
            }
        });
        let weak_self = self.self_weak.borrow().clone();
        let item_id = id.to_string();
        motion.connect_leave(move |_| {
            if let Some(view) = weak_self.upgrade() {
                view.showcase
                    .borrow_mut()
                    .hover_leave(&item_id, Instant::now());
                view.needs_frame.set(true);
            }
        });
        card.widget().add_controller(motion);
    }

    /// Sync container height and expanded styling with the latest pack.
    fn after_repack(&self) {
        let showcase = self.showcase.borrow();
        let height = showcase.grid().container_height.round() as i32;
        if height != self.last_height_request.replace(height) {
            self.fixed.set_size_request(-1, height);
        }
        for (id, card) in self.cards.borrow().iter() {
            card.set_expanded(showcase.expanded_id() == Some(id.as_str()));
        }
        self.needs_frame.set(true);
    }

    fn apply_frames(&self, now: Instant) {
        let frames = self.showcase.borrow().tick(now);
        let cards = self.cards.borrow();
        for (id, frame) in &frames {
            if let Some(card) = cards.get(id) {
                self.place(card, frame);
            }
        }
    }

    fn place(&self, card: &ProjectCard, frame: &Frame) {
        let g = frame.scaled_geometry();
        let width = g.width.round().max(1.0) as i32;
        let height = g.height.round().max(1.0) as i32;
        card.widget().set_size_request(width, height);
        self.fixed.move_(card.widget(), g.x as f64, g.y as f64);
        card.apply_frame(frame);
    }
}
