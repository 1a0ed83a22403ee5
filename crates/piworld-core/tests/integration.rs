//! Integration tests for piworld-core.
//!
//! These drive the dashboard the way an adapter does:
//! initialize → start scheduler → poll / run jobs → control events → snapshot.

use std::time::{Duration, Instant};

use piworld_core::{
    ControlEvent, Dashboard, DashboardConfig, DashboardError, Metric, RefreshJob, SchedulerState,
    format_uptime, hex_to_rgba,
};

fn seeded_dashboard() -> Dashboard {
    Dashboard::simulated(DashboardConfig::default(), Some(2024))
}

#[test]
fn one_minute_of_refreshes() {
    let mut dashboard = seeded_dashboard();
    let mut scheduler = dashboard.initialize().unwrap();
    let t0 = Instant::now();
    scheduler.start(t0).unwrap();

    let mut prev = dashboard.sensors().cloned().unwrap();
    for tick in 1..=600u64 {
        for job in scheduler.poll(t0 + Duration::from_millis(tick * 100)) {
            dashboard.run(job);
        }
        let now = dashboard.sensors().cloned().unwrap();
        for metric in Metric::ALL {
            let a = prev.get(metric).unwrap().value;
            let b = now.get(metric).unwrap().value;
            assert!(metric.range().contains(b));
            assert!((a - b).abs() <= 2.5);
        }
        prev = now;
    }

    let snap = dashboard.snapshot();
    // One immediate refresh plus 30 sensor ticks and 12 system ticks.
    assert_eq!(snap.sensor_refreshes, 31);
    assert_eq!(snap.system_refreshes, 13);
}

#[test]
fn scheduler_teardown() {
    let mut dashboard = seeded_dashboard();
    let mut scheduler = dashboard.initialize().unwrap();
    let t0 = Instant::now();
    scheduler.start(t0).unwrap();
    scheduler.dispose();
    assert_eq!(scheduler.state(), SchedulerState::Disposed);
    assert!(scheduler.poll(t0 + Duration::from_secs(60)).is_empty());
    assert_eq!(
        scheduler.start(t0),
        Err(DashboardError::SchedulerDisposed)
    );
}

#[test]
fn independent_dashboards_do_not_share_state() {
    let mut a = seeded_dashboard();
    let mut b = seeded_dashboard();
    a.initialize().unwrap();
    b.initialize().unwrap();

    a.handle(ControlEvent::PowerOn).unwrap();
    a.handle(ControlEvent::Preset("#00ff00".into())).unwrap();

    assert!(!b.led().on);
    assert_eq!(b.led().color.to_string(), "#ff0000");
}

#[test]
fn snapshot_serializes_for_adapters() {
    let mut dashboard = seeded_dashboard();
    dashboard.initialize().unwrap();
    dashboard.handle(ControlEvent::PowerOn).unwrap();
    dashboard
        .handle(ControlEvent::BrightnessInput("60".into()))
        .unwrap();

    let json = serde_json::to_value(dashboard.snapshot()).unwrap();
    assert_eq!(json["led"]["on"], true);
    assert_eq!(json["led"]["color"], "#ff0000");
    assert_eq!(json["led"]["brightness"], 60);
    assert_eq!(json["brightness_label"], "60%");
    assert_eq!(json["preview"]["opacity"], 0.6);
    assert_eq!(
        json["preview"]["box_shadow"],
        "0 0 30px rgba(255, 0, 0, 0.6), 0 0 60px rgba(255, 0, 0, 0.4)"
    );
    assert_eq!(json["sensors"]["readings"].as_array().unwrap().len(), 4);
    assert_eq!(json["sensors"]["readings"][0]["metric"], "cpu_temp");
}

#[test]
fn formatting_helpers() {
    assert_eq!(format_uptime(0), "0m");
    assert_eq!(format_uptime(3661), "1h 1m");
    assert_eq!(format_uptime(90_000), "1d 1h 0m");
    assert_eq!(hex_to_rgba("#ff0000", 0.5).unwrap(), "rgba(255, 0, 0, 0.5)");
}

#[test]
fn manual_refresh_between_ticks() {
    let mut dashboard = seeded_dashboard();
    dashboard.initialize().unwrap();
    dashboard.run(RefreshJob::SystemInfo);
    let info = dashboard.system_info().unwrap();
    assert!(info.uptime_secs < 86_400);
    assert_eq!(dashboard.snapshot().system_refreshes, 2);
}
