use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use piworld_core::{Dashboard, Metric, RefreshJob, Scheduler};

use super::DashboardOptions;

/// Upper bound on one sleep so Ctrl+C is noticed promptly.
const MAX_NAP: Duration = Duration::from_millis(100);

pub fn run(ticks: Option<u64>, options: DashboardOptions) {
    let mut dashboard = super::make_dashboard(options);
    let mut scheduler = match dashboard.initialize() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Ctrl+C received, stopping");
        r.store(false, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl+C handler: {e}");
        std::process::exit(1);
    }

    println!("Watching simulated telemetry ({})", dashboard.source_name());
    println!("  Sensors:  every {}ms", options.sensor_interval_ms);
    println!("  System:   every {}ms", options.system_interval_ms);
    match ticks {
        Some(n) => println!("  Stop:     after {n} refreshes"),
        None => println!("  Stop:     Ctrl+C"),
    }
    println!();
    println!("{}", job_line(&dashboard, RefreshJob::Sensors));
    println!("{}", job_line(&dashboard, RefreshJob::SystemInfo));

    if let Err(e) = scheduler.start(Instant::now()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let done = watch_loop(&mut dashboard, &mut scheduler, ticks, &running, |line| {
        println!("{line}")
    });

    scheduler.dispose();
    let snap = dashboard.snapshot();
    log::info!(
        "watch stopped after {done} scheduled refreshes ({} sensor, {} system in total)",
        snap.sensor_refreshes,
        snap.system_refreshes
    );
}

/// Run due refresh jobs until `running` clears or `ticks` refreshes have
/// run, handing each job's line to `emit`. Returns the number of refreshes.
fn watch_loop(
    dashboard: &mut Dashboard,
    scheduler: &mut Scheduler,
    ticks: Option<u64>,
    running: &AtomicBool,
    mut emit: impl FnMut(String),
) -> u64 {
    let limit_reached = |done: u64| ticks.is_some_and(|n| done >= n);
    let mut done = 0u64;

    'outer: while running.load(Ordering::SeqCst) && !limit_reached(done) {
        for job in scheduler.poll(Instant::now()) {
            if limit_reached(done) {
                break 'outer;
            }
            dashboard.run(job);
            emit(job_line(dashboard, job));
            done += 1;
        }

        if limit_reached(done) {
            break;
        }
        let nap = scheduler
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(MAX_NAP)
            .min(MAX_NAP);
        thread::sleep(nap);
    }
    done
}

/// One line describing the data a refresh job just produced.
fn job_line(dashboard: &Dashboard, job: RefreshJob) -> String {
    match job {
        RefreshJob::Sensors => {
            let readings = dashboard
                .sensors()
                .map(|s| {
                    Metric::ALL
                        .iter()
                        .filter_map(|m| s.get(*m))
                        .map(|r| format!("{} {}", short_label(r.metric), r.text))
                        .collect::<Vec<_>>()
                        .join("  ")
                })
                .unwrap_or_else(|| "no readings".to_string());
            format!("[{}] sensors  {readings}", piworld_core::telemetry::clock_time())
        }
        RefreshJob::SystemInfo => match dashboard.system_info() {
            Some(info) => format!(
                "[{}] system   uptime {}  load {}",
                info.last_updated, info.uptime, info.load_text
            ),
            None => format!("[{}] system   no data", piworld_core::telemetry::clock_time()),
        },
    }
}

fn short_label(metric: Metric) -> &'static str {
    match metric {
        Metric::CpuTemp => "temp",
        Metric::MemoryUsage => "mem",
        Metric::CpuUsage => "cpu",
        Metric::DiskUsage => "disk",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piworld_core::DashboardConfig;

    #[test]
    fn sensor_line_lists_every_metric() {
        let mut dashboard = Dashboard::simulated(DashboardConfig::default(), Some(3));
        dashboard.initialize().unwrap();
        let line = job_line(&dashboard, RefreshJob::Sensors);
        for label in ["temp ", "mem ", "cpu ", "disk "] {
            assert!(line.contains(label), "{line}");
        }
        assert!(line.contains("°C"));
    }

    #[test]
    fn system_line_shows_uptime_and_load() {
        let mut dashboard = Dashboard::simulated(DashboardConfig::default(), Some(3));
        dashboard.initialize().unwrap();
        let info = dashboard.system_info().unwrap().clone();
        let line = job_line(&dashboard, RefreshJob::SystemInfo);
        assert!(line.contains(&info.uptime));
        assert!(line.contains(&info.load_text));
    }

    fn fast_dashboard() -> (Dashboard, Scheduler) {
        let config = DashboardConfig {
            sensor_interval: Duration::from_millis(10),
            system_interval: Duration::from_millis(25),
            ..DashboardConfig::default()
        };
        let mut dashboard = Dashboard::simulated(config, Some(5));
        let mut scheduler = dashboard.initialize().unwrap();
        scheduler.start(Instant::now()).unwrap();
        (dashboard, scheduler)
    }

    #[test]
    fn zero_ticks_runs_nothing() {
        let (mut dashboard, mut scheduler) = fast_dashboard();
        let running = AtomicBool::new(true);
        let mut lines = Vec::new();
        let done = watch_loop(&mut dashboard, &mut scheduler, Some(0), &running, |l| {
            lines.push(l)
        });
        assert_eq!(done, 0);
        assert!(lines.is_empty());
        assert_eq!(dashboard.snapshot().sensor_refreshes, 1);
    }

    #[test]
    fn stops_after_requested_ticks() {
        let (mut dashboard, mut scheduler) = fast_dashboard();
        let running = AtomicBool::new(true);
        let mut lines = Vec::new();
        let done = watch_loop(&mut dashboard, &mut scheduler, Some(3), &running, |l| {
            lines.push(l)
        });
        assert_eq!(done, 3);
        assert_eq!(lines.len(), 3);
        let snap = dashboard.snapshot();
        assert_eq!(snap.sensor_refreshes + snap.system_refreshes, 2 + 3);
    }

    #[test]
    fn cleared_flag_stops_immediately() {
        let (mut dashboard, mut scheduler) = fast_dashboard();
        let running = AtomicBool::new(false);
        let done = watch_loop(&mut dashboard, &mut scheduler, None, &running, |_| {});
        assert_eq!(done, 0);
    }

    #[test]
    fn lines_before_initialize() {
        let dashboard = Dashboard::simulated(DashboardConfig::default(), Some(3));
        assert!(job_line(&dashboard, RefreshJob::Sensors).ends_with("no readings"));
        assert!(job_line(&dashboard, RefreshJob::SystemInfo).ends_with("no data"));
    }
}
