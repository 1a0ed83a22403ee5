//! HTTP dashboard server.
//!
//! Serves the browser dashboard page and a JSON API over a shared
//! [`Dashboard`]. A background task drives the refresh [`Scheduler`] and is
//! torn down when the server shuts down.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use piworld_core::{
    Brightness, ControlEvent, Dashboard, DashboardError, DashboardSnapshot, LedColor, LedPreview,
    LedState, Preset, Scheduler, SensorSnapshot, SystemInfo,
};

/// The browser dashboard. Polls `/api/dashboard` and posts to `/api/control`.
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared server state.
struct AppState {
    dashboard: Mutex<Dashboard>,
}

#[derive(Deserialize, Default)]
struct LedUpdate {
    on: Option<bool>,
    color: Option<String>,
    brightness: Option<u32>,
}

impl LedUpdate {
    fn parse(&self) -> Result<(Option<LedColor>, Option<Brightness>), DashboardError> {
        let color = self.color.as_deref().map(LedColor::parse).transpose()?;
        let brightness = self
            .brightness
            .map(|b| Brightness::parse(&b.to_string()))
            .transpose()?;
        Ok((color, brightness))
    }
}

#[derive(Deserialize)]
struct PowerRequest {
    on: bool,
}

#[derive(Deserialize, Default)]
struct PresetRequest {
    /// Preset color, as carried by a preset button.
    color: Option<String>,
    /// Preset name from `/api/presets` (used when `color` is absent).
    name: Option<String>,
}

#[derive(Serialize)]
struct LedResponse {
    success: bool,
    led: LedState,
    picker_color: LedColor,
    brightness_label: String,
    preview: LedPreview,
    /// Error message if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    telemetry: String,
    sensor_refreshes: u64,
    system_refreshes: u64,
}

impl LedResponse {
    fn from_dashboard(dashboard: &Dashboard, error: Option<String>) -> Self {
        Self {
            success: error.is_none(),
            led: *dashboard.led(),
            picker_color: dashboard.picker_color(),
            brightness_label: dashboard.brightness_label(),
            preview: dashboard.preview().clone(),
            error,
        }
    }
}

fn error_status(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::Actuator(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn led_result(
    dashboard: &Dashboard,
    result: Result<(), DashboardError>,
) -> (StatusCode, Json<LedResponse>) {
    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(LedResponse::from_dashboard(dashboard, None)),
        ),
        Err(e) => (
            error_status(&e),
            Json(LedResponse::from_dashboard(dashboard, Some(e.to_string()))),
        ),
    }
}

/// A body that failed to parse gets the same JSON error shape as one that
/// failed validation.
fn rejected(
    dashboard: &Dashboard,
    rejection: &JsonRejection,
) -> (StatusCode, Json<LedResponse>) {
    log::debug!("rejected request body: {rejection}");
    (
        StatusCode::BAD_REQUEST,
        Json(LedResponse::from_dashboard(
            dashboard,
            Some(rejection.body_text()),
        )),
    )
}

async fn handle_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let dashboard = state.dashboard.lock().await;
    let presets: Vec<&str> = dashboard.presets().iter().map(|p| p.name.as_str()).collect();

    Json(serde_json::json!({
        "name": "Pi World Dashboard",
        "version": piworld_core::VERSION,
        "telemetry": dashboard.source_name(),
        "endpoints": {
            "/": "Browser dashboard",
            "/api": "This API index",
            "/api/dashboard": "Full snapshot: LED state, preview, sensors, system info",
            "/api/sensors": "Latest sensor readings",
            "/api/system": "Latest uptime, load average, and refresh time",
            "/api/led": {
                "GET": "Current LED state and preview",
                "POST": "Partial update: {\"on\": bool, \"color\": \"#RRGGBB\", \"brightness\": 0-100}",
            },
            "/api/led/power": "POST {\"on\": bool}",
            "/api/led/preset": format!("POST {{\"color\": \"#RRGGBB\"}} or {{\"name\": ...}}. Names: {}", presets.join(", ")),
            "/api/control": "POST a control event, e.g. {\"type\": \"brightness_input\", \"value\": \"40\"}",
            "/api/presets": "Configured preset colors",
            "/health": "Health check",
        },
    }))
}

async fn handle_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.lock().await.snapshot())
}

async fn handle_sensors(State(state): State<Arc<AppState>>) -> Json<SensorSnapshot> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.sensors().cloned().unwrap_or_default())
}

async fn handle_system(State(state): State<Arc<AppState>>) -> Json<Option<SystemInfo>> {
    Json(state.dashboard.lock().await.system_info().cloned())
}

async fn handle_presets(State(state): State<Arc<AppState>>) -> Json<Vec<Preset>> {
    Json(state.dashboard.lock().await.presets().to_vec())
}

async fn handle_get_led(State(state): State<Arc<AppState>>) -> Json<LedResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(LedResponse::from_dashboard(&dashboard, None))
}

/// Apply a partial LED update. Every field is validated before any is
/// applied; power goes last so the actuator sees the final state.
async fn handle_set_led(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LedUpdate>, JsonRejection>,
) -> (StatusCode, Json<LedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(&dashboard, &rejection),
    };
    let result = update.parse().and_then(|(color, brightness)| {
        if let Some(color) = color {
            dashboard.set_led_color(color);
        }
        if let Some(brightness) = brightness {
            dashboard.set_brightness_level(brightness);
        }
        match update.on {
            Some(on) => dashboard.set_power(on),
            None => Ok(()),
        }
    });
    led_result(&dashboard, result)
}

async fn handle_power(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PowerRequest>, JsonRejection>,
) -> (StatusCode, Json<LedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(&dashboard, &rejection),
    };
    let result = dashboard.set_power(req.on);
    led_result(&dashboard, result)
}

async fn handle_preset(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PresetRequest>, JsonRejection>,
) -> (StatusCode, Json<LedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(&dashboard, &rejection),
    };
    let result = match (req.color.as_deref(), req.name.as_deref()) {
        (Some(color), _) => dashboard.apply_preset(color),
        (None, Some(name)) => dashboard.apply_preset_named(name),
        (None, None) => Err(DashboardError::UnknownPreset(String::new())),
    };
    led_result(&dashboard, result)
}

async fn handle_control(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ControlEvent>, JsonRejection>,
) -> (StatusCode, Json<LedResponse>) {
    let mut dashboard = state.dashboard.lock().await;
    let Json(event) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(&dashboard, &rejection),
    };
    let result = dashboard.handle(event);
    led_result(&dashboard, result)
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let dashboard = state.dashboard.lock().await;
    let snap = dashboard.snapshot();
    Json(HealthResponse {
        status: "healthy".to_string(),
        telemetry: dashboard.source_name().to_string(),
        sensor_refreshes: snap.sensor_refreshes,
        system_refreshes: snap.system_refreshes,
    })
}

/// Build the axum router.
fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_page))
        .route("/api", get(handle_index))
        .route("/api/dashboard", get(handle_dashboard))
        .route("/api/sensors", get(handle_sensors))
        .route("/api/system", get(handle_system))
        .route("/api/presets", get(handle_presets))
        .route("/api/led", get(handle_get_led).post(handle_set_led))
        .route("/api/led/power", post(handle_power))
        .route("/api/led/preset", post(handle_preset))
        .route("/api/control", post(handle_control))
        .route("/health", get(handle_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Refresh task
// ---------------------------------------------------------------------------

/// Current time on tokio's clock, so a paused test runtime drives the scheduler.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Background task running scheduled refreshes against the shared dashboard.
struct RefreshTask {
    stop: watch::Sender<bool>,
    handle: JoinHandle<Scheduler>,
}

impl RefreshTask {
    fn spawn(state: Arc<AppState>, mut scheduler: Scheduler) -> Result<Self, DashboardError> {
        scheduler.start(now())?;
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            while let Some(deadline) = scheduler.next_deadline() {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline.into()) => {
                        let due = scheduler.poll(now());
                        if due.is_empty() {
                            continue;
                        }
                        let mut dashboard = state.dashboard.lock().await;
                        for job in due {
                            dashboard.run(job);
                        }
                    }
                    _ = stopped.changed() => break,
                }
            }
            scheduler.dispose();
            scheduler
        });

        Ok(Self { stop, handle })
    }

    /// Stop the task and wait for it; returns the disposed scheduler.
    async fn shutdown(self) -> Option<Scheduler> {
        let _ = self.stop.send(true);
        self.handle.await.ok()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutdown requested");
}

/// Initialize the dashboard and serve it until Ctrl+C.
pub async fn run_server(mut dashboard: Dashboard, host: &str, port: u16) -> std::io::Result<()> {
    let scheduler = dashboard.initialize().map_err(std::io::Error::other)?;
    let state = Arc::new(AppState {
        dashboard: Mutex::new(dashboard),
    });
    let refresh =
        RefreshTask::spawn(Arc::clone(&state), scheduler).map_err(std::io::Error::other)?;

    let app = build_router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Pi World dashboard listening on http://{addr}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    refresh.shutdown().await;
    served
}
