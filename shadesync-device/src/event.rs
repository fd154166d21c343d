use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Last commanded movement intent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    #[default]
    Unknown,
    Increasing,
    Decreasing,
    Stopped,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Unknown => write!(f, "unknown"),
            DeviceState::Increasing => write!(f, "increasing"),
            DeviceState::Decreasing => write!(f, "decreasing"),
            DeviceState::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    StateChange { value: DeviceState },
    PositionChange { value: u8 },
}

impl DeviceEvent {
    pub fn kind(&self) -> DeviceEventKind {
        match self {
            DeviceEvent::StateChange { .. } => DeviceEventKind::StateChange,
            DeviceEvent::PositionChange { .. } => DeviceEventKind::PositionChange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceEventKind {
    StateChange,
    PositionChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&DeviceEvent) + Send + Sync>;

/// Synchronous listener registry keyed by event kind.
///
/// Listeners of one kind run in registration order. Delivery works on a
/// snapshot of the registry, so a listener may register, remove or call back
/// into the emitter while it runs.
pub struct EventEmitter {
    listeners: RwLock<HashMap<DeviceEventKind, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn on<F>(&self, kind: DeviceEventKind, listener: F) -> ListenerId
    where
        F: Fn(&DeviceEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));

        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);

        for registered in listeners.values_mut() {
            if let Some(index) = registered.iter().position(|(other, _)| *other == id) {
                registered.remove(index);
                return true;
            }
        }

        false
    }

    pub fn listener_count(&self, kind: DeviceEventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers the event and returns how many listeners saw it.
    pub fn emit(&self, event: DeviceEvent) -> usize {
        let snapshot: Vec<Listener> = match self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.kind())
        {
            Some(registered) => registered.iter().map(|(_, l)| Arc::clone(l)).collect(),
            None => return 0,
        };

        for listener in &snapshot {
            listener(&event);
        }

        snapshot.len()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
