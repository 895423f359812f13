// Row widget displaying one project in the launcher list.
// Wraps the toolkit-independent ProjectRow core and re-emits its events as
// GObject signals whose emitter is the row itself.

use glib::subclass::Signal;
use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    glib, Align, Box as GtkBox, GestureClick, Label, Orientation, Picture, ToggleButton,
};
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use std::sync::OnceLock;

use super::icons::{load_icon_texture, RowIcons};
use crate::models::{GodotVersion, ProjectFile};
use crate::row::{
    FavoriteVisual, IconSource, InputEvent, PointerEvent, ProjectRow, RowDisplay, RowEnv, RowEvent,
    RowView, SATURATION_STEPS,
};

const ICON_SIZE: i32 = 64;
const ROW_SPACING: i32 = 12;

/// Events raised through `connect_row_event`, besides `favorite-clicked`.
const PLAIN_EVENTS: [RowEvent; 6] = [
    RowEvent::Clicked,
    RowEvent::DoubleClicked,
    RowEvent::RightClicked,
    RowEvent::RightDoubleClicked,
    RowEvent::DragStarted,
    RowEvent::DragEnded,
];

/// CSS class selecting the heart's saturation filter; see `saturation_css`.
pub fn saturation_class(step: u8) -> String {
    format!("saturation-{step}")
}

/// Stylesheet mapping every saturation class to a `saturate()` filter.
pub fn saturation_css() -> String {
    (0..=SATURATION_STEPS)
        .map(|step| {
            let amount = f32::from(step) / f32::from(SATURATION_STEPS);
            let class = saturation_class(step);
            format!(".favorite-heart.{class} {{ filter: saturate({amount}); }}\n")
        })
        .collect()
}

/// Bridges the row core to the widget. Holds a weak reference so the core,
/// which lives inside the widget, does not keep it alive.
pub struct WidgetView {
    widget: glib::WeakRef<ProjectRowWidget>,
}

impl RowView for WidgetView {
    fn show(&self, display: &RowDisplay) {
        if let Some(widget) = self.widget.upgrade() {
            widget.apply_display(display);
        }
    }

    fn show_version(&self, label: &str) {
        if let Some(widget) = self.widget.upgrade() {
            if let Some(children) = widget.imp().children.get() {
                children.version.set_text(label);
            }
        }
    }

    fn show_favorite_visual(&self, visual: FavoriteVisual) {
        if let Some(widget) = self.widget.upgrade() {
            widget.apply_favorite_visual(visual);
        }
    }

    fn clear(&self) {
        if let Some(widget) = self.widget.upgrade() {
            widget.apply_blank();
        }
    }

    fn reset_tint(&self) {
        if let Some(widget) = self.widget.upgrade() {
            widget.set_tinted(false);
        }
    }

    fn emit(&self, event: RowEvent) {
        if let Some(widget) = self.widget.upgrade() {
            widget.emit_row_event(event);
        }
    }
}

mod imp {
    use super::*;

    pub struct RowChildren {
        pub icon: Picture,
        pub name: Label,
        pub description: Label,
        pub location: Label,
        pub version: Label,
        pub heart: ToggleButton,
    }

    #[derive(Default)]
    pub struct ProjectRowWidgetInner {
        pub children: OnceCell<RowChildren>,
        pub core: OnceCell<ProjectRow<WidgetView>>,
        pub icons: RefCell<RowIcons>,
        pub favorite_handler: RefCell<Option<glib::SignalHandlerId>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ProjectRowWidgetInner {
        const NAME: &'static str = "GdlaunchProjectRow";
        type Type = super::ProjectRowWidget;
        type ParentType = GtkBox;
    }

    impl ObjectImpl for ProjectRowWidgetInner {
        fn signals() -> &'static [Signal] {
            static SIGNALS: OnceLock<Vec<Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                let mut signals = vec![Signal::builder(
                    RowEvent::FavoriteClicked(false).signal_name(),
                )
                .param_types([bool::static_type()])
                .build()];
                signals.extend(
                    PLAIN_EVENTS
                        .iter()
                        .map(|event| Signal::builder(event.signal_name()).build()),
                );
                signals
            })
        }

        fn constructed(&self) {
            self.parent_constructed();

            let obj = self.obj();
            obj.set_orientation(Orientation::Horizontal);
            obj.set_spacing(ROW_SPACING);
            obj.set_hexpand(true);
            obj.add_css_class("project-row");

            let children = obj.build_children();
            let core = ProjectRow::new(
                WidgetView {
                    widget: obj.downgrade(),
                },
                RowEnv::default(),
            );

            let weak = obj.downgrade();
            let handler = children.heart.connect_toggled(move |heart| {
                let Some(row) = weak.upgrade() else {
                    return;
                };
                let accepted = row
                    .core()
                    .is_some_and(|core| core.favorite_toggled(heart.is_active()));
                if !accepted {
                    // Nothing bound: the heart stays off.
                    row.set_heart_active(false);
                }
            });
            self.favorite_handler.replace(Some(handler));

            let click = GestureClick::new();
            click.set_button(0);
            let weak = obj.downgrade();
            click.connect_pressed(move |gesture, n_press, _x, _y| {
                let press = PointerEvent::from_press(gesture.current_button(), n_press);
                if let Some(core) = weak.upgrade().and_then(|row| row.core()) {
                    core.handle_input(&InputEvent::ButtonPress(press));
                }
            });
            let weak = obj.downgrade();
            click.connect_released(move |gesture, n_press, _x, _y| {
                let release = PointerEvent::from_press(gesture.current_button(), n_press);
                if let Some(core) = weak.upgrade().and_then(|row| row.core()) {
                    core.handle_input(&InputEvent::ButtonRelease(release));
                }
            });
            obj.add_controller(click);

            // Both are set exactly once, right here.
            let _ = self.children.set(children);
            let _ = self.core.set(core);
        }

        fn dispose(&self) {
            if let Some(core) = self.core.get() {
                core.teardown();
            }
        }
    }

    impl WidgetImpl for ProjectRowWidgetInner {
        fn realize(&self) {
            self.parent_realize();
            if let Some(core) = self.core.get() {
                core.go_live();
            }
        }
    }

    impl BoxImpl for ProjectRowWidgetInner {}
}

glib::wrapper! {
    pub struct ProjectRowWidget(ObjectSubclass<imp::ProjectRowWidgetInner>)
        @extends GtkBox, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl ProjectRowWidget {
    pub fn new() -> Self {
        Object::builder().build()
    }

    /// Create a row with custom fallback icons.
    pub fn with_icons(icons: RowIcons) -> Self {
        let row = Self::new();
        row.imp().icons.replace(icons);
        row
    }

    pub fn set_record(&self, record: Rc<ProjectFile>) {
        if let Some(core) = self.core() {
            core.set_record(record);
        }
    }

    /// Unbind the current record, preparing for reuse.
    pub fn clear_record(&self) {
        if let Some(core) = self.core() {
            core.clear_record();
        }
    }

    pub fn set_version(&self, version: Option<GodotVersion>) {
        if let Some(core) = self.core() {
            core.set_version(version);
        }
    }

    pub fn record(&self) -> Option<Rc<ProjectFile>> {
        self.core().and_then(|core| core.record())
    }

    pub fn missing_project(&self) -> bool {
        self.core().is_some_and(|core| core.missing_project())
    }

    /// Re-check the file system for the bound project and its icon.
    pub fn refresh(&self) {
        if let Some(core) = self.core() {
            core.render();
        }
    }

    /// Highlight tint applied by the container; single clicks clear it.
    pub fn set_tinted(&self, tinted: bool) {
        if tinted {
            self.add_css_class("tinted");
        } else {
            self.remove_css_class("tinted");
        }
    }

    pub fn connect_favorite_clicked<F>(&self, callback: F) -> glib::SignalHandlerId
    where
        F: Fn(&Self, bool) + 'static,
    {
        self.connect_local(
            RowEvent::FavoriteClicked(false).signal_name(),
            false,
            move |values| {
                let row = values.first()?.get::<Self>().ok()?;
                let favorite = values.get(1)?.get::<bool>().ok()?;
                callback(&row, favorite);
                None
            },
        )
    }

    /// Connect one callback to every event the row raises.
    pub fn connect_row_event<F>(&self, callback: F)
    where
        F: Fn(&Self, RowEvent) + 'static,
    {
        let callback = Rc::new(callback);
        for event in PLAIN_EVENTS {
            let callback = callback.clone();
            self.connect_local(event.signal_name(), false, move |values| {
                let row = values.first()?.get::<Self>().ok()?;
                callback(&row, event);
                None
            });
        }
        self.connect_favorite_clicked(move |row, favorite| {
            callback(row, RowEvent::FavoriteClicked(favorite));
        });
    }

    fn core(&self) -> Option<ProjectRow<WidgetView>> {
        self.imp().core.get().cloned()
    }

    fn build_children(&self) -> imp::RowChildren {
        let icon = Picture::new();
        icon.set_size_request(ICON_SIZE, ICON_SIZE);
        icon.set_can_shrink(true);
        icon.set_content_fit(gtk4::ContentFit::Contain);
        icon.set_valign(Align::Center);
        icon.add_css_class("project-icon");

        let text_label = |class: &str| {
            let label = Label::new(None);
            label.set_halign(Align::Start);
            label.set_xalign(0.0);
            label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
            label.add_css_class(class);
            label
        };
        let name = text_label("project-name");
        let description = text_label("project-description");
        let location = text_label("project-location");

        let text_column = GtkBox::new(Orientation::Vertical, 2);
        text_column.set_hexpand(true);
        text_column.set_valign(Align::Center);
        text_column.append(&name);
        text_column.append(&description);
        text_column.append(&location);

        let version = Label::new(None);
        version.set_valign(Align::Center);
        version.add_css_class("project-version");

        let heart = ToggleButton::new();
        heart.set_icon_name("emblem-favorite-symbolic");
        heart.set_valign(Align::Center);
        heart.add_css_class("favorite-heart");
        heart.add_css_class("flat");

        self.append(&icon);
        self.append(&text_column);
        self.append(&version);
        self.append(&heart);

        imp::RowChildren {
            icon,
            name,
            description,
            location,
            version,
            heart,
        }
    }

    fn apply_display(&self, display: &RowDisplay) {
        let imp = self.imp();
        let Some(children) = imp.children.get() else {
            return;
        };

        children.name.set_text(&display.name);
        children.description.set_text(&display.description);
        children.description.set_visible(!display.description.is_empty());
        children.location.set_text(&display.location);

        self.set_heart_active(display.favorite);
        self.apply_favorite_visual(display.favorite_visual);

        let texture = {
            let icons = imp.icons.borrow();
            match &display.icon {
                IconSource::Missing => icons.missing.clone(),
                IconSource::Default => icons.default.clone(),
                IconSource::File(path) => {
                    load_icon_texture(path).unwrap_or_else(|| icons.default.clone())
                }
            }
        };
        children.icon.set_paintable(Some(&texture));

        if display.missing_project {
            self.add_css_class("missing");
        } else {
            self.remove_css_class("missing");
        }
    }

    /// Move the heart without raising `favorite-clicked`.
    fn set_heart_active(&self, active: bool) {
        let imp = self.imp();
        let Some(children) = imp.children.get() else {
            return;
        };
        if let Some(handler) = imp.favorite_handler.borrow().as_ref() {
            children.heart.block_signal(handler);
            children.heart.set_active(active);
            children.heart.unblock_signal(handler);
        }
    }

    fn apply_favorite_visual(&self, visual: FavoriteVisual) {
        let Some(children) = self.imp().children.get() else {
            return;
        };
        children.heart.set_opacity(f64::from(visual.v));
        for step in 0..=SATURATION_STEPS {
            children.heart.remove_css_class(&saturation_class(step));
        }
        children
            .heart
            .add_css_class(&saturation_class(visual.saturation_step()));
        if visual.is_favorited() {
            children.heart.add_css_class("favorited");
        } else {
            children.heart.remove_css_class("favorited");
        }
    }

    fn apply_blank(&self) {
        let imp = self.imp();
        let Some(children) = imp.children.get() else {
            return;
        };
        for label in [
            &children.name,
            &children.description,
            &children.location,
            &children.version,
        ] {
            label.set_text("");
        }
        self.set_heart_active(false);
        self.apply_favorite_visual(FavoriteVisual::default());
        children.icon.set_paintable(Some(&imp.icons.borrow().default));
        self.remove_css_class("missing");
        self.set_tinted(false);
    }

    fn emit_row_event(&self, event: RowEvent) {
        tracing::debug!(?event, "Project row event");
        match event {
            RowEvent::FavoriteClicked(favorite) => {
                self.emit_by_name::<()>(event.signal_name(), &[&favorite]);
            }
            _ => self.emit_by_name::<()>(event.signal_name(), &[]),
        }
    }
}

impl Default for ProjectRowWidget {
    fn default() -> Self {
        Self::new()
    }
}
