//! Input routing and listener ownership.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::RunId;

/// Keys the variants react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Char(char),
}

/// An input event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer press in canvas coordinates.
    PointerDown { x: f32, y: f32 },
    /// Selection of an on-surface option by index.
    Select(usize),
}

impl InputEvent {
    /// Listener kind that receives this event.
    pub fn kind(&self) -> ListenerKind {
        match self {
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => ListenerKind::Keyboard,
            InputEvent::PointerDown { .. } => ListenerKind::Pointer,
            InputEvent::Select(_) => ListenerKind::Selection,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerKind {
    Keyboard,
    Pointer,
    Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Registration {
    owner: RunId,
    kind: ListenerKind,
}

/// Registry of the input listeners currently installed.
///
/// Each listener belongs to exactly one minigame run. Events reach a run
/// only while it holds a listener of the matching kind.
#[derive(Debug, Default)]
pub struct InputBus {
    listeners: HashMap<ListenerId, Registration>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, owner: RunId, kind: ListenerKind) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.insert(id, Registration { owner, kind });
        tracing::trace!(run_id = %owner, ?kind, "listener registered");
        id
    }

    /// Remove a listener. Returns `false` if it was not installed.
    pub fn deregister(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Whether `owner` holds a listener of `kind`.
    pub fn wants(&self, owner: RunId, kind: ListenerKind) -> bool {
        self.listeners
            .values()
            .any(|reg| reg.owner == owner && reg.kind == kind)
    }

    /// Number of listeners owned by `owner`.
    pub fn owned_by(&self, owner: RunId) -> usize {
        self.listeners
            .values()
            .filter(|reg| reg.owner == owner)
            .count()
    }

    /// Drop every listener owned by `owner`, returning how many there were.
    pub fn release_run(&mut self, owner: RunId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|_, reg| reg.owner != owner);
        before - self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        assert_eq!(InputEvent::KeyDown(Key::Space).kind(), ListenerKind::Keyboard);
        assert_eq!(InputEvent::KeyUp(Key::ArrowUp).kind(), ListenerKind::Keyboard);
        assert_eq!(InputEvent::PointerDown { x: 1.0, y: 2.0 }.kind(), ListenerKind::Pointer);
        assert_eq!(InputEvent::Select(0).kind(), ListenerKind::Selection);
    }

    #[test]
    fn test_register_and_route() {
        let mut bus = InputBus::new();
        let run = RunId::new();
        let other = RunId::new();

        let key = bus.register(run, ListenerKind::Keyboard);
        bus.register(other, ListenerKind::Pointer);

        assert!(bus.wants(run, ListenerKind::Keyboard));
        assert!(!bus.wants(run, ListenerKind::Pointer));
        assert!(bus.wants(other, ListenerKind::Pointer));

        assert!(bus.deregister(key));
        assert!(!bus.deregister(key));
        assert!(!bus.wants(run, ListenerKind::Keyboard));
    }

    #[test]
    fn test_release_run() {
        let mut bus = InputBus::new();
        let run = RunId::new();
        let other = RunId::new();

        bus.register(run, ListenerKind::Keyboard);
        bus.register(run, ListenerKind::Pointer);
        bus.register(other, ListenerKind::Selection);

        assert_eq!(bus.owned_by(run), 2);
        assert_eq!(bus.release_run(run), 2);
        assert_eq!(bus.owned_by(run), 0);
        assert_eq!(bus.len(), 1);
    }
}
