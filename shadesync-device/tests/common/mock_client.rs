use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use shadesync_device::{
    Action, ActionRequest, ActuationClient, ActuationError, Device, DeviceConfig, DeviceEvent,
    DeviceEventKind, DeviceState,
};

pub const TOPIC: &str = "topic_1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Action(Action),
    State(DeviceState),
    Position(u8),
}

/// Ordered record of outbound actions and emitted events.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Entry>>>);

impl Journal {
    pub fn push(&self, entry: Entry) {
        self.0.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.0.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Action(action) => Some(action),
                _ => None,
            })
            .collect()
    }

    pub fn positions(&self) -> Vec<u8> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Position(position) => Some(position),
                _ => None,
            })
            .collect()
    }

    pub fn states(&self) -> Vec<DeviceState> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                Entry::State(state) => Some(state),
                _ => None,
            })
            .collect()
    }
}

pub struct MockClient {
    journal: Journal,
    requests: Mutex<Vec<ActionRequest>>,
    fail_on: Option<Action>,
    gate: Option<Arc<Semaphore>>,
    inits: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            journal: Journal::default(),
            requests: Mutex::new(Vec::new()),
            fail_on: None,
            gate: None,
            inits: AtomicUsize::new(0),
        }
    }

    /// Every request for `action` is rejected.
    pub fn failing(action: Action) -> Self {
        Self {
            fail_on: Some(action),
            ..Self::new()
        }
    }

    /// Requests block until a permit is added to the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let client = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new()
        };

        (client, gate)
    }

    pub fn requests(&self) -> Vec<ActionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn init_count(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActuationClient for MockClient {
    async fn init(&self) -> Result<(), ActuationError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn action(&self, request: ActionRequest) -> Result<(), ActuationError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.fail_on == Some(request.action) {
            return Err(ActuationError::rejected(request.action, "mock failure"));
        }

        self.journal.push(Entry::Action(request.action));
        Ok(())
    }
}

pub struct MockDevice {
    pub device: Device,
    pub client: Arc<MockClient>,
    pub journal: Journal,
}

impl MockDevice {
    /// 20 s full travel with 1 s ticks: five positions per tick.
    pub fn new(position: u8) -> Self {
        Self::with_client(MockClient::new(), position)
    }

    pub fn with_client(client: MockClient, position: u8) -> Self {
        let config = DeviceConfig::new(TOPIC, Duration::from_secs(20)).with_name("Name 1");
        Self::with_config(config, client, position)
    }

    pub fn with_config(config: DeviceConfig, client: MockClient, position: u8) -> Self {
        let client = Arc::new(client);
        let device = Device::new(config, client.clone()).unwrap();

        device.apply_position_change(f64::from(position));

        let journal = client.journal.clone();
        device.on(DeviceEventKind::StateChange, {
            let journal = journal.clone();
            move |event| {
                if let DeviceEvent::StateChange { value } = event {
                    journal.push(Entry::State(*value));
                }
            }
        });
        device.on(DeviceEventKind::PositionChange, {
            let journal = journal.clone();
            move |event| {
                if let DeviceEvent::PositionChange { value } = event {
                    journal.push(Entry::Position(*value));
                }
            }
        });

        Self {
            device,
            client,
            journal,
        }
    }
}
