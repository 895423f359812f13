// Classification of raw pointer input into row interaction events

/// Pointer button, numbered the way GDK numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    Other(u32),
}

impl PointerButton {
    pub fn from_gdk(button: u32) -> Self {
        match button {
            1 => Self::Left,
            2 => Self::Middle,
            3 => Self::Right,
            n => Self::Other(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub double_click: bool,
}

impl PointerEvent {
    /// Build from a GTK click gesture; the second press of a sequence is the
    /// double click, later presses start over as single clicks.
    pub fn from_press(button: u32, n_press: i32) -> Self {
        Self {
            button: PointerButton::from_gdk(button),
            double_click: n_press == 2,
        }
    }
}

/// Input delivered to a row. Only button presses are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ButtonPress(PointerEvent),
    ButtonRelease(PointerEvent),
}

/// Events a row raises to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    FavoriteClicked(bool),
    Clicked,
    DoubleClicked,
    RightClicked,
    RightDoubleClicked,
    // Declared for containers; nothing emits these yet.
    DragStarted,
    DragEnded,
}

impl RowEvent {
    /// Single clicks put the row back to its neutral tint.
    pub fn resets_tint(self) -> bool {
        matches!(self, Self::Clicked | Self::RightClicked)
    }

    pub fn signal_name(self) -> &'static str {
        match self {
            Self::FavoriteClicked(_) => "favorite-clicked",
            Self::Clicked => "clicked",
            Self::DoubleClicked => "double-clicked",
            Self::RightClicked => "right-clicked",
            Self::RightDoubleClicked => "right-double-clicked",
            Self::DragStarted => "drag-started",
            Self::DragEnded => "drag-ended",
        }
    }
}

pub fn classify(event: &InputEvent) -> Option<RowEvent> {
    let InputEvent::ButtonPress(press) = event else {
        return None;
    };
    match (press.button, press.double_click) {
        (PointerButton::Left, true) => Some(RowEvent::DoubleClicked),
        (PointerButton::Left, false) => Some(RowEvent::Clicked),
        (PointerButton::Right, true) => Some(RowEvent::RightDoubleClicked),
        (PointerButton::Right, false) => Some(RowEvent::RightClicked),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: PointerButton, double_click: bool) -> InputEvent {
        InputEvent::ButtonPress(PointerEvent { button, double_click })
    }

    #[test]
    fn test_left_and_right_families() {
        let cases = [
            (PointerButton::Left, false, RowEvent::Clicked),
            (PointerButton::Left, true, RowEvent::DoubleClicked),
            (PointerButton::Right, false, RowEvent::RightClicked),
            (PointerButton::Right, true, RowEvent::RightDoubleClicked),
        ];
        for (button, double_click, expected) in cases {
            assert_eq!(classify(&press(button, double_click)), Some(expected));
        }
    }

    #[test]
    fn test_other_input_is_ignored() {
        for double_click in [false, true] {
            assert_eq!(classify(&press(PointerButton::Middle, double_click)), None);
            assert_eq!(classify(&press(PointerButton::Other(8), double_click)), None);
        }
        let release = PointerEvent { button: PointerButton::Left, double_click: false };
        assert_eq!(classify(&InputEvent::ButtonRelease(release)), None);
        let release = PointerEvent { button: PointerButton::Right, double_click: true };
        assert_eq!(classify(&InputEvent::ButtonRelease(release)), None);
    }

    #[test]
    fn test_gdk_press_mapping() {
        assert_eq!(
            PointerEvent::from_press(1, 1),
            PointerEvent { button: PointerButton::Left, double_click: false }
        );
        assert_eq!(
            PointerEvent::from_press(3, 2),
            PointerEvent { button: PointerButton::Right, double_click: true }
        );
        assert!(!PointerEvent::from_press(1, 3).double_click);
        assert_eq!(PointerButton::from_gdk(2), PointerButton::Middle);
    }

    #[test]
    fn test_only_single_clicks_reset_tint() {
        assert!(RowEvent::Clicked.resets_tint());
        assert!(RowEvent::RightClicked.resets_tint());
        assert!(!RowEvent::DoubleClicked.resets_tint());
        assert!(!RowEvent::RightDoubleClicked.resets_tint());
        assert!(!RowEvent::FavoriteClicked(true).resets_tint());
    }
}
