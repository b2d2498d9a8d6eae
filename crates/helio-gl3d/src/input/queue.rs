use crate::input::interaction::InteractionKind;

/// Input event types the camera core understands.
/// Positions are viewport pixels, origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A button press began at (x, y).
    PointerDown { x: f64, y: f64 },
    /// The pointer moved to (x, y).
    PointerMove { x: f64, y: f64 },
    /// The button was released at (x, y).
    PointerUp { x: f64, y: f64 },
    /// Mouse wheel; positive notches zoom out.
    Wheel { notches: f64 },
    /// Toolbar selected a different drag interaction.
    SelectInteraction(InteractionKind),
    /// Return the camera to its default pose.
    ResetCamera,
}

/// A queue of input events.
/// The UI thread pushes events; the render loop drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
