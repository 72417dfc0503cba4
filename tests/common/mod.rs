//! Shared fixtures: a scripted brewing backend and session builders.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use brew_watch::client::{BrewApi, ClientError, StartBrewRequest, StartBrewResponse};
use brew_watch::domain::{BrewId, BrewSession, BrewStatus, RecipeSnapshot, TemperatureSample};

/// Fixed reference instant for scripted sessions.
pub fn t0() -> DateTime<Utc> {
    let Some(ts) = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).single() else {
        panic!("valid timestamp");
    };
    ts
}

/// A session with a 60 minute mash and boil, mash started at [`t0`].
pub fn session(id: &str, status: BrewStatus) -> BrewSession {
    let mash_started = status != BrewStatus::Pending;
    BrewSession {
        id: BrewId::new(id),
        status,
        created_at: t0(),
        ended_at: (status == BrewStatus::Ended).then(t0),
        recipe_snapshot: RecipeSnapshot {
            name: Some("Pale Ale".to_string()),
            mash_temp_c: Some(66.0),
            mash_time_min: Some(60.0),
            boil_time_min: Some(60.0),
            target_abv: Some(5.2),
            ..RecipeSnapshot::default()
        },
        mash_status: if mash_started {
            BrewStatus::Started
        } else {
            BrewStatus::Pending
        },
        boil_status: BrewStatus::Pending,
        mash_start: mash_started.then(t0),
        mash_end: None,
        boil_start: None,
        boil_end: None,
        notes: None,
        secret_key: Some("K-123".to_string()),
        original_gravity: None,
        final_gravity: None,
        abv: None,
    }
}

/// One temperature sample `secs` after [`t0`].
pub fn sample(secs: i64, celsius: f64) -> TemperatureSample {
    TemperatureSample {
        recorded_at: t0() + chrono::TimeDelta::seconds(secs),
        temperature_celsius: celsius,
    }
}

/// Backend whose responses are set by the test.
#[derive(Debug)]
pub struct ScriptedApi {
    session: Mutex<Result<BrewSession, ClientError>>,
    temperature: Mutex<Result<Vec<TemperatureSample>, ClientError>>,
    session_gate: Mutex<Option<Arc<Semaphore>>>,
    session_calls: AtomicUsize,
    temperature_calls: AtomicUsize,
    end_calls: AtomicUsize,
}

impl ScriptedApi {
    /// Serves `session` and an empty temperature log.
    pub fn new(session: Result<BrewSession, ClientError>) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(session),
            temperature: Mutex::new(Ok(Vec::new())),
            session_gate: Mutex::new(None),
            session_calls: AtomicUsize::new(0),
            temperature_calls: AtomicUsize::new(0),
            end_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_session(&self, session: Result<BrewSession, ClientError>) {
        *self.session.lock() = session;
    }

    pub fn set_temperature(&self, samples: Result<Vec<TemperatureSample>, ClientError>) {
        *self.temperature.lock() = samples;
    }

    /// Holds every session fetch until a permit is added to the returned
    /// semaphore.
    pub fn gate_sessions(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.session_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub fn temperature_calls(&self) -> usize {
        self.temperature_calls.load(Ordering::SeqCst)
    }

    pub fn end_calls(&self) -> usize {
        self.end_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrewApi for ScriptedApi {
    async fn fetch_session(&self, _brew_id: &BrewId) -> Result<BrewSession, ClientError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.session_gate.lock().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        self.session.lock().clone()
    }

    async fn fetch_temperature_logs(
        &self,
        _brew_id: &BrewId,
    ) -> Result<Vec<TemperatureSample>, ClientError> {
        self.temperature_calls.fetch_add(1, Ordering::SeqCst);
        self.temperature.lock().clone()
    }

    async fn end_brew(&self, _brew_id: &BrewId) -> Result<(), ClientError> {
        self.end_calls.fetch_add(1, Ordering::SeqCst);
        let mut session = self.session.lock();
        if let Ok(s) = session.as_mut() {
            s.status = BrewStatus::Ended;
            s.ended_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn start_brew(&self, request: &StartBrewRequest) -> Result<StartBrewResponse, ClientError> {
        Ok(StartBrewResponse {
            id: BrewId::new(format!("{}-brew", request.recipe_id)),
        })
    }

    async fn test_brewery_connection(&self, brewery_id: &str) -> Result<(), ClientError> {
        if brewery_id == "offline" {
            return Err(ClientError::Status {
                status: 503,
                message: "controller offline".to_string(),
            });
        }
        Ok(())
    }
}

/// Lets spawned tracker work run without moving paused time noticeably.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// A running service wired to a scripted backend.
#[derive(Debug)]
pub struct TestApp {
    pub addr: std::net::SocketAddr,
    pub api: Arc<ScriptedApi>,
    pub service: Arc<brew_watch::service::BrewService>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Serves the full router on an ephemeral port with fast timers.
pub async fn spawn_app(api: Arc<ScriptedApi>) -> TestApp {
    use axum::Router;
    use axum::routing::get;
    use brew_watch::app_state::AppState;
    use brew_watch::domain::EventBus;
    use brew_watch::service::BrewService;
    use brew_watch::tracker::{SystemClock, TrackerOptions, TrackerRegistry};

    let events = EventBus::new(1024);
    let dyn_api: Arc<dyn BrewApi> = Arc::clone(&api) as Arc<dyn BrewApi>;
    let registry = Arc::new(TrackerRegistry::new(
        Arc::clone(&dyn_api),
        Arc::new(SystemClock),
        events.clone(),
        TrackerOptions {
            poll_interval: Duration::from_millis(50),
            clock_tick: Duration::from_millis(20),
        },
    ));
    let service = Arc::new(BrewService::new(registry, dyn_api, events.clone()));
    let state = AppState {
        brew_service: Arc::clone(&service),
        event_bus: events,
    };
    let app = Router::new()
        .merge(brew_watch::api::build_router())
        .route("/ws", get(brew_watch::ws::handler::ws_handler))
        .with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind test server");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("test server address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    TestApp { addr, api, service }
}
