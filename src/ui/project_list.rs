// ListView of project rows
// Rows are recycled by the factory: bind hands a row its record, unbind
// releases it so the same widget can show another project.

use glib::Object;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    gio, glib, ListItem, ListView, NoSelection, PolicyType, ScrolledWindow, SignalListItemFactory,
};
use std::cell::RefCell;
use std::rc::Rc;

use super::icons::RowIcons;
use super::project_row::ProjectRowWidget;
use crate::models::{GodotVersion, ProjectFile};
use crate::row::RowEvent;

type RowEventCallback = Box<dyn Fn(&ProjectRowWidget, &Rc<ProjectFile>, RowEvent)>;

// GObject wrapper so project records can live in a ListStore
mod project_object {
    use super::*;

    mod imp {
        use super::*;

        #[derive(Default)]
        pub struct ProjectObjectInner {
            pub record: RefCell<Option<Rc<ProjectFile>>>,
            pub version: RefCell<Option<GodotVersion>>,
        }

        #[glib::object_subclass]
        impl ObjectSubclass for ProjectObjectInner {
            const NAME: &'static str = "GdlaunchProjectObject";
            type Type = super::ProjectObject;
            type ParentType = glib::Object;
        }

        impl ObjectImpl for ProjectObjectInner {}
    }

    glib::wrapper! {
        pub struct ProjectObject(ObjectSubclass<imp::ProjectObjectInner>);
    }

    impl ProjectObject {
        pub fn new(record: Rc<ProjectFile>, version: Option<GodotVersion>) -> Self {
            let obj: Self = Object::builder().build();
            obj.imp().record.replace(Some(record));
            obj.imp().version.replace(version);
            obj
        }

        pub fn record(&self) -> Option<Rc<ProjectFile>> {
            self.imp().record.borrow().clone()
        }

        pub fn version(&self) -> Option<GodotVersion> {
            self.imp().version.borrow().clone()
        }
    }
}

pub use project_object::ProjectObject;

/// Scrollable list hosting one `ProjectRowWidget` per visible project.
pub struct ProjectListView {
    scrolled_window: ScrolledWindow,
    model: gio::ListStore,
    on_row_event: Rc<RefCell<Option<RowEventCallback>>>,
}

impl ProjectListView {
    pub fn new() -> Self {
        let model = gio::ListStore::new::<ProjectObject>();
        let selection_model = NoSelection::new(Some(model.clone()));
        let factory = SignalListItemFactory::new();

        let on_row_event: Rc<RefCell<Option<RowEventCallback>>> = Rc::new(RefCell::new(None));
        let on_row_event_setup = on_row_event.clone();
        // One set of fallback textures shared by every row.
        let icons = RowIcons::default();

        factory.connect_setup(move |_factory, list_item| {
            let Some(list_item) = list_item.downcast_ref::<ListItem>() else {
                return;
            };
            let row = ProjectRowWidget::with_icons(icons.clone());
            let on_row_event = on_row_event_setup.clone();
            row.connect_row_event(move |row, event| {
                let Some(record) = row.record() else {
                    return;
                };
                if let Some(ref callback) = *on_row_event.borrow() {
                    callback(row, &record, event);
                }
            });
            list_item.set_child(Some(&row));
        });

        factory.connect_bind(|_factory, list_item| {
            let Some(list_item) = list_item.downcast_ref::<ListItem>() else {
                return;
            };
            let Some(project) = list_item.item().and_downcast::<ProjectObject>() else {
                return;
            };
            let Some(row) = list_item.child().and_downcast::<ProjectRowWidget>() else {
                return;
            };

            row.set_version(project.version());
            if let Some(record) = project.record() {
                row.set_record(record);
            }
        });

        factory.connect_unbind(|_factory, list_item| {
            let Some(list_item) = list_item.downcast_ref::<ListItem>() else {
                return;
            };
            if let Some(row) = list_item.child().and_downcast::<ProjectRowWidget>() {
                row.clear_record();
            }
        });

        factory.connect_teardown(|_factory, list_item| {
            if let Some(list_item) = list_item.downcast_ref::<ListItem>() {
                list_item.set_child(Option::<&gtk4::Widget>::None);
            }
        });

        let list_view = ListView::new(Some(selection_model), Some(factory));
        list_view.set_single_click_activate(false);
        list_view.add_css_class("project-list");
        list_view.set_hexpand(true);
        list_view.set_vexpand(true);

        let scrolled_window = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .child(&list_view)
            .build();

        Self {
            scrolled_window,
            model,
            on_row_event,
        }
    }

    pub fn widget(&self) -> &ScrolledWindow {
        &self.scrolled_window
    }

    pub fn push(&self, record: Rc<ProjectFile>, version: Option<GodotVersion>) {
        self.model.append(&ProjectObject::new(record, version));
    }

    pub fn project_count(&self) -> u32 {
        self.model.n_items()
    }

    pub fn connect_row_event<F>(&self, callback: F)
    where
        F: Fn(&ProjectRowWidget, &Rc<ProjectFile>, RowEvent) + 'static,
    {
        *self.on_row_event.borrow_mut() = Some(Box::new(callback));
    }
}

impl Default for ProjectListView {
    fn default() -> Self {
        Self::new()
    }
}
