//! Camera change notifications.
//!
//! Each camera owns a `CameraListeners` registry. Listeners are called
//! synchronously, in registration order. Dispatch borrows the registry
//! mutably, so listeners cannot add or remove listeners while being notified.

use glam::{DMat4, DQuat, DVec3};

/// What happened to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    /// A committed change (end of a drag, an animation settling, a programmatic move).
    Moved,
    /// Intermediate feedback while a drag or animation is in progress.
    Moving,
}

/// State handed to listeners with each event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub rotation: DQuat,
    pub translation: DVec3,
    pub transformation: DMat4,
    /// Camera revision at dispatch time.
    pub revision: u64,
}

pub trait CameraListener {
    fn on_camera_event(&mut self, event: CameraEvent, camera: &CameraSnapshot);
}

impl<F> CameraListener for F
where
    F: FnMut(CameraEvent, &CameraSnapshot),
{
    fn on_camera_event(&mut self, event: CameraEvent, camera: &CameraSnapshot) {
        self(event, camera)
    }
}

/// Handle returned by `CameraListeners::add` for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

#[derive(Default)]
pub struct CameraListeners {
    entries: Vec<(ListenerId, Box<dyn CameraListener>)>,
    next_id: u32,
}

impl CameraListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: Box<dyn CameraListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn dispatch(&mut self, event: CameraEvent, camera: &CameraSnapshot) {
        for (_, listener) in self.entries.iter_mut() {
            listener.on_camera_event(event, camera);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CameraListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraListeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn snapshot() -> CameraSnapshot {
        CameraSnapshot {
            rotation: DQuat::IDENTITY,
            translation: DVec3::ZERO,
            transformation: DMat4::IDENTITY,
            revision: 7,
        }
    }

    #[test]
    fn dispatch_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = CameraListeners::new();
        for tag in ["a", "b", "c"] {
            let log = log.clone();
            listeners.add(Box::new(move |event: CameraEvent, _: &CameraSnapshot| {
                log.borrow_mut().push((tag, event));
            }));
        }

        listeners.dispatch(CameraEvent::Moving, &snapshot());
        listeners.dispatch(CameraEvent::Moved, &snapshot());

        let log = log.borrow();
        assert_eq!(
            *log,
            vec![
                ("a", CameraEvent::Moving),
                ("b", CameraEvent::Moving),
                ("c", CameraEvent::Moving),
                ("a", CameraEvent::Moved),
                ("b", CameraEvent::Moved),
                ("c", CameraEvent::Moved),
            ]
        );
    }

    #[test]
    fn removed_listener_is_not_called() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners = CameraListeners::new();
        let c = count.clone();
        let id = listeners.add(Box::new(move |_: CameraEvent, _: &CameraSnapshot| {
            *c.borrow_mut() += 1;
        }));

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.dispatch(CameraEvent::Moved, &snapshot());
        assert_eq!(*count.borrow(), 0);
        assert!(listeners.is_empty());
    }
}
