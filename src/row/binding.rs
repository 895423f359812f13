// Binding of a row to an observable project record.
//
// A row starts out Configured: records and versions can be assigned but
// nothing is subscribed or rendered. `go_live` subscribes to the bound record
// and renders; from then on every assignment takes effect immediately.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::env::RowEnv;
use super::favorite::FavoriteVisual;
use super::input::{classify, InputEvent, RowEvent};
use super::render::{version_label, RowDisplay};
use crate::models::{ChangeNotifier, GodotVersion, ProjectFile, SubscriptionId};

/// Sink for everything a row shows and raises. Implemented by the widget.
pub trait RowView: 'static {
    fn show(&self, display: &RowDisplay);
    fn show_version(&self, label: &str);
    fn show_favorite_visual(&self, visual: FavoriteVisual);
    /// Blank the row after its record was unbound.
    fn clear(&self);
    fn reset_tint(&self);
    fn emit(&self, event: RowEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configured,
    Live,
}

/// The bound record and, once live, the row's single subscription to it.
struct Binding {
    record: Rc<ProjectFile>,
    subscription: Option<SubscriptionId>,
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.record.unsubscribe(id);
        }
    }
}

struct RowState {
    phase: Phase,
    binding: Option<Binding>,
    version: Option<GodotVersion>,
    display: Option<RowDisplay>,
    favorite_visual: FavoriteVisual,
}

struct RowInner<V> {
    view: V,
    env: RowEnv,
    state: RefCell<RowState>,
}

/// Toolkit-independent core of a project row. Cloning shares the same row.
pub struct ProjectRow<V: RowView> {
    inner: Rc<RowInner<V>>,
}

impl<V: RowView> Clone for ProjectRow<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: RowView> ProjectRow<V> {
    pub fn new(view: V, env: RowEnv) -> Self {
        Self {
            inner: Rc::new(RowInner {
                view,
                env,
                state: RefCell::new(RowState {
                    phase: Phase::Configured,
                    binding: None,
                    version: None,
                    display: None,
                    favorite_visual: FavoriteVisual::default(),
                }),
            }),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// Perform the first render. Calling it again does nothing.
    pub fn go_live(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.phase == Phase::Live {
                return;
            }
            state.phase = Phase::Live;
            if let Some(binding) = state.binding.as_mut() {
                binding.subscription = Some(self.subscribe_render(&binding.record));
            }
        }
        self.refresh_version();
        self.render();
    }

    pub fn set_record(&self, record: Rc<ProjectFile>) {
        {
            let mut state = self.inner.state.borrow_mut();
            let already_bound = state
                .binding
                .as_ref()
                .is_some_and(|binding| Rc::ptr_eq(&binding.record, &record));

            if !already_bound {
                // Dropping the old binding releases its subscription.
                drop(state.binding.take());
                let subscription =
                    (state.phase == Phase::Live).then(|| self.subscribe_render(&record));
                trace!(name = %record.name(), live = subscription.is_some(), "Binding project row");
                state.binding = Some(Binding {
                    record,
                    subscription,
                });
            }
        }
        self.render();
    }

    /// Unbind the current record so the row can be reused.
    pub fn clear_record(&self) {
        let (previous, live) = {
            let mut state = self.inner.state.borrow_mut();
            state.display = None;
            state.favorite_visual = FavoriteVisual::default();
            (state.binding.take(), state.phase == Phase::Live)
        };
        if previous.is_some() && live {
            self.inner.view.clear();
        }
    }

    pub fn set_version(&self, version: Option<GodotVersion>) {
        self.inner.state.borrow_mut().version = version;
        self.refresh_version();
    }

    /// Re-read the bound record and the file system and push the result to the view.
    pub fn render(&self) {
        let record = {
            let state = self.inner.state.borrow();
            if state.phase != Phase::Live {
                return;
            }
            match &state.binding {
                Some(binding) => Rc::clone(&binding.record),
                None => return,
            }
        };

        let rendered = RowDisplay::project(&record, &self.inner.env);
        {
            let mut state = self.inner.state.borrow_mut();
            state.favorite_visual = rendered.favorite_visual;
            state.display = Some(rendered.clone());
        }
        debug!(
            name = %rendered.name,
            missing = rendered.missing_project,
            favorite = rendered.favorite,
            "Rendered project row"
        );
        self.inner.view.show(&rendered);
    }

    /// Classify raw input and raise the resulting event, if any.
    pub fn handle_input(&self, event: &InputEvent) -> Option<RowEvent> {
        let row_event = classify(event)?;
        if row_event.resets_tint() {
            self.inner.view.reset_tint();
        }
        self.inner.view.emit(row_event);
        Some(row_event)
    }

    /// The favorite control changed state. Returns `false`, raising nothing,
    /// when no record is bound.
    pub fn favorite_toggled(&self, favorite: bool) -> bool {
        let visual = FavoriteVisual::for_state(favorite);
        {
            let mut state = self.inner.state.borrow_mut();
            if state.binding.is_none() {
                trace!(favorite, "Ignoring favorite toggle on unbound row");
                return false;
            }
            state.favorite_visual = visual;
        }
        self.inner.view.show_favorite_visual(visual);
        self.inner.view.emit(RowEvent::FavoriteClicked(favorite));
        true
    }

    /// Release the subscription on the bound record. Dropping the last
    /// handle to the row does the same.
    pub fn teardown(&self) {
        drop(self.inner.state.borrow_mut().binding.take());
    }

    pub fn record(&self) -> Option<Rc<ProjectFile>> {
        self.inner
            .state
            .borrow()
            .binding
            .as_ref()
            .map(|binding| Rc::clone(&binding.record))
    }

    #[cfg(test)]
    pub fn version(&self) -> Option<GodotVersion> {
        self.inner.state.borrow().version.clone()
    }

    pub fn display(&self) -> Option<RowDisplay> {
        self.inner.state.borrow().display.clone()
    }

    /// Whether the bound project file was missing at the last render.
    pub fn missing_project(&self) -> bool {
        self.inner
            .state
            .borrow()
            .display
            .as_ref()
            .is_some_and(|display| display.missing_project)
    }

    pub fn favorite_visual(&self) -> FavoriteVisual {
        self.inner.state.borrow().favorite_visual
    }

    fn refresh_version(&self) {
        let label = {
            let state = self.inner.state.borrow();
            if state.phase != Phase::Live {
                return;
            }
            version_label(state.version.as_ref())
        };
        self.inner.view.show_version(&label);
    }

    fn subscribe_render(&self, record: &ProjectFile) -> SubscriptionId {
        let weak: Weak<RowInner<V>> = Rc::downgrade(&self.inner);
        record.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                ProjectRow { inner }.render();
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::env::{FileProbe, ResPathResolver};
    use crate::row::input::{PointerButton, PointerEvent};
    use crate::row::render::{IconSource, UNKNOWN_LOCATION, UNKNOWN_VERSION};
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Show(RowDisplay),
        Version(String),
        Visual(FavoriteVisual),
        Clear,
        ResetTint,
        Emit(RowEvent),
    }

    #[derive(Clone, Default)]
    struct RecordingView {
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl RecordingView {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.borrow_mut())
        }

        fn show_count(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| matches!(c, Call::Show(_)))
                .count()
        }

        fn emitted(&self) -> Vec<RowEvent> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Emit(event) => Some(*event),
                    _ => None,
                })
                .collect()
        }
    }

    impl RowView for RecordingView {
        fn show(&self, display: &RowDisplay) {
            self.calls.borrow_mut().push(Call::Show(display.clone()));
        }
        fn show_version(&self, label: &str) {
            self.calls.borrow_mut().push(Call::Version(label.to_string()));
        }
        fn show_favorite_visual(&self, visual: FavoriteVisual) {
            self.calls.borrow_mut().push(Call::Visual(visual));
        }
        fn clear(&self) {
            self.calls.borrow_mut().push(Call::Clear);
        }
        fn reset_tint(&self) {
            self.calls.borrow_mut().push(Call::ResetTint);
        }
        fn emit(&self, event: RowEvent) {
            self.calls.borrow_mut().push(Call::Emit(event));
        }
    }

    struct FakeProbe(HashSet<PathBuf>);

    impl FileProbe for FakeProbe {
        fn exists(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn row_with(files: &[&str]) -> (ProjectRow<RecordingView>, RecordingView) {
        let files = files.iter().map(PathBuf::from).collect();
        let env = RowEnv::new(Rc::new(FakeProbe(files)), Rc::new(ResPathResolver));
        let view = RecordingView::default();
        (ProjectRow::new(view.clone(), env), view)
    }

    fn live_row(files: &[&str]) -> (ProjectRow<RecordingView>, RecordingView) {
        let (row, view) = row_with(files);
        row.go_live();
        view.take();
        (row, view)
    }

    fn record(name: &str, location: &str) -> Rc<ProjectFile> {
        Rc::new(ProjectFile::new(name, location))
    }

    #[test]
    fn test_rebind_keeps_single_subscription() {
        let (row, view) = live_row(&["/p/a/project.godot", "/p/b/project.godot"]);
        let a = record("A", "/p/a/project.godot");
        let b = record("B", "/p/b/project.godot");

        row.set_record(Rc::clone(&a));
        row.set_record(Rc::clone(&b));
        row.set_record(Rc::clone(&a));
        assert_eq!(a.subscriber_count(), 1);
        assert_eq!(b.subscriber_count(), 0);

        let before = view.show_count();
        a.set_name("A2");
        assert_eq!(view.show_count(), before + 1);
        b.set_name("B2");
        assert_eq!(view.show_count(), before + 1);
        assert_eq!(row.display().map(|d| d.name), Some("A2".to_string()));
    }

    #[test]
    fn test_rebinding_same_record_does_not_resubscribe() {
        let (row, view) = live_row(&[]);
        let a = record("A", "/p/a/project.godot");
        row.set_record(Rc::clone(&a));
        row.set_record(Rc::clone(&a));
        assert_eq!(a.subscriber_count(), 1);
        assert_eq!(view.show_count(), 2);
    }

    #[test]
    fn test_render_is_idempotent() {
        let (row, view) = live_row(&["/p/a/project.godot", "/p/a/icon.svg"]);
        let a = Rc::new(
            ProjectFile::new("A", "/p/a/project.godot")
                .with_description("first")
                .with_icon("res://icon.svg"),
        );
        row.set_record(a);
        let first = row.display();
        row.render();
        assert_eq!(row.display(), first);

        let shows: Vec<Call> = view
            .take()
            .into_iter()
            .filter(|c| matches!(c, Call::Show(_)))
            .collect();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0], shows[1]);
    }

    #[test]
    fn test_missing_project_scenario() {
        let (row, view) = live_row(&[]);
        let demo = Rc::new(
            ProjectFile::new("Demo", "/tmp/missing.godot")
                .with_icon("res://icon.png")
                .with_favorite(false),
        );
        row.set_record(demo);

        assert!(row.missing_project());
        let display = row.display().unwrap();
        assert_eq!(display.location, UNKNOWN_LOCATION);
        assert_eq!(display.icon, IconSource::Missing);
        assert!(!display.favorite);
        assert_eq!(display.favorite_visual, FavoriteVisual { s: 0.0, v: 0.5 });
        assert_eq!(row.favorite_visual(), FavoriteVisual::UNFAVORITED);
        assert!(view.emitted().is_empty());
    }

    #[test]
    fn test_missing_state_is_a_snapshot() {
        let (row, _view) = live_row(&["/p/a/project.godot"]);
        let a = record("A", "/p/a/project.godot");
        row.set_record(Rc::clone(&a));
        assert!(!row.missing_project());

        a.set_location("/p/gone/project.godot");
        assert!(row.missing_project());
    }

    #[test]
    fn test_favorite_round_trip() {
        let (row, view) = live_row(&["/p/a/project.godot"]);
        row.set_record(Rc::new(
            ProjectFile::new("A", "/p/a/project.godot").with_favorite(true),
        ));
        let original = row.favorite_visual();
        assert_eq!(original, FavoriteVisual::FAVORITED);
        view.take();

        assert!(row.favorite_toggled(false));
        assert_eq!(row.favorite_visual(), FavoriteVisual::UNFAVORITED);
        assert!(row.favorite_toggled(true));
        assert_eq!(row.favorite_visual(), original);

        assert_eq!(
            view.take(),
            vec![
                Call::Visual(FavoriteVisual::UNFAVORITED),
                Call::Emit(RowEvent::FavoriteClicked(false)),
                Call::Visual(FavoriteVisual::FAVORITED),
                Call::Emit(RowEvent::FavoriteClicked(true)),
            ]
        );
    }

    #[test]
    fn test_record_favorite_change_rerenders_without_event() {
        let (row, view) = live_row(&["/p/a/project.godot"]);
        let a = record("A", "/p/a/project.godot");
        row.set_record(Rc::clone(&a));
        view.take();

        a.set_favorite(true);
        assert_eq!(row.favorite_visual(), FavoriteVisual::FAVORITED);
        assert_eq!(view.show_count(), 1);
        assert!(view.emitted().is_empty());
    }

    #[test]
    fn test_left_click_emits_clicked_only() {
        let (row, view) = live_row(&[]);
        let event = InputEvent::ButtonPress(PointerEvent {
            button: PointerButton::Left,
            double_click: false,
        });
        assert_eq!(row.handle_input(&event), Some(RowEvent::Clicked));
        assert_eq!(view.take(), vec![Call::ResetTint, Call::Emit(RowEvent::Clicked)]);
    }

    #[test]
    fn test_right_double_click_emits_right_double_clicked_only() {
        let (row, view) = live_row(&[]);
        let event = InputEvent::ButtonPress(PointerEvent {
            button: PointerButton::Right,
            double_click: true,
        });
        assert_eq!(row.handle_input(&event), Some(RowEvent::RightDoubleClicked));
        assert_eq!(view.take(), vec![Call::Emit(RowEvent::RightDoubleClicked)]);
    }

    #[test]
    fn test_unknown_button_emits_nothing() {
        let (row, view) = live_row(&[]);
        let event = InputEvent::ButtonPress(PointerEvent {
            button: PointerButton::Middle,
            double_click: true,
        });
        assert_eq!(row.handle_input(&event), None);
        assert!(view.take().is_empty());
    }

    #[test]
    fn test_configured_row_waits_for_go_live() {
        let (row, view) = row_with(&["/p/a/project.godot"]);
        let a = record("A", "/p/a/project.godot");
        row.set_record(Rc::clone(&a));
        row.set_version(Some(GodotVersion::new("4.2")));

        assert_eq!(row.phase(), Phase::Configured);
        assert_eq!(a.subscriber_count(), 0);
        assert!(view.take().is_empty());
        a.set_name("A2");
        assert!(row.display().is_none());

        row.go_live();
        row.go_live();
        assert_eq!(row.phase(), Phase::Live);
        assert_eq!(a.subscriber_count(), 1);
        let calls = view.take();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], Call::Version("Godot 4.2".to_string()));
        assert!(matches!(&calls[1], Call::Show(display) if display.name == "A2"));
    }

    #[test]
    fn test_version_falls_back_to_unknown() {
        let (row, view) = live_row(&[]);
        row.set_version(Some(GodotVersion::new("3.5")));
        row.set_version(None);
        assert_eq!(
            view.take(),
            vec![
                Call::Version("Godot 3.5".to_string()),
                Call::Version(UNKNOWN_VERSION.to_string()),
            ]
        );
        assert!(row.version().is_none());
    }

    #[test]
    fn test_clear_record_unsubscribes() {
        let (row, view) = live_row(&[]);
        let a = record("A", "/p/a/project.godot");
        row.set_record(Rc::clone(&a));
        view.take();

        row.clear_record();
        row.clear_record();
        assert_eq!(a.subscriber_count(), 0);
        assert!(row.record().is_none());
        assert!(row.display().is_none());
        assert_eq!(view.take(), vec![Call::Clear]);

        a.set_name("A2");
        assert_eq!(view.show_count(), 0);
    }

    #[test]
    fn test_teardown_and_drop_unsubscribe() {
        let a = record("A", "/p/a/project.godot");
        let (row, _view) = live_row(&[]);
        row.set_record(Rc::clone(&a));
        row.teardown();
        row.teardown();
        assert_eq!(a.subscriber_count(), 0);

        let b = record("B", "/p/b/project.godot");
        let (row, _view) = live_row(&[]);
        row.set_record(Rc::clone(&b));
        let other_handle = row.clone();
        drop(row);
        assert_eq!(b.subscriber_count(), 1);
        drop(other_handle);
        assert_eq!(b.subscriber_count(), 0);
    }

    #[test]
    fn test_favorite_toggle_on_unbound_row_is_ignored() {
        let (row, view) = live_row(&[]);
        assert!(!row.favorite_toggled(true));
        assert!(view.take().is_empty());
        assert_eq!(row.favorite_visual(), FavoriteVisual::UNFAVORITED);

        let a = Rc::new(ProjectFile::new("A", "/p/a/project.godot").with_favorite(true));
        row.set_record(Rc::clone(&a));
        row.clear_record();
        view.take();
        assert_eq!(row.favorite_visual(), FavoriteVisual::UNFAVORITED);
        assert!(!row.favorite_toggled(false));
        assert!(view.emitted().is_empty());
        assert!(a.favorite());
    }
}
