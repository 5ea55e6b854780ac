/// Pointer transitions the view reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Exit,
}

/// Turns a per-frame "is hovered" flag into enter/exit edges
#[derive(Debug, Default, Clone, Copy)]
pub struct HoverTracker {
    hovered: bool,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn update(&mut self, hovered: bool) -> Option<PointerEvent> {
        if hovered == self.hovered {
            return None;
        }
        self.hovered = hovered;
        Some(if hovered {
            PointerEvent::Enter
        } else {
            PointerEvent::Exit
        })
    }
}
