//! TUI application state and event loop.
//!
//! The dashboard and its scheduler live on the UI thread. Each frame the loop
//! handles at most one key press, then polls the scheduler and runs whatever
//! refresh jobs are due.

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use piworld_core::{Dashboard, DashboardError, Scheduler};

/// Brightness change per `+` / `-` key press.
const BRIGHTNESS_STEP: i16 = 5;

/// Last outcome shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

pub struct App {
    dashboard: Dashboard,
    scheduler: Scheduler,
    running: bool,
    paused: bool,
    status: Option<Status>,
}

impl App {
    /// Takes an initialized dashboard and its (stopped) scheduler.
    pub fn new(dashboard: Dashboard, scheduler: Scheduler) -> Self {
        Self {
            dashboard,
            scheduler,
            running: true,
            paused: false,
            status: None,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before printing a panic.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        self.scheduler.dispose();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        self.scheduler
            .start(Instant::now())
            .map_err(io::Error::other)?;

        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }

            self.tick(Instant::now());
        }

        Ok(())
    }

    /// Run every refresh job due at `now`. Returns how many ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let jobs = self.scheduler.poll(now);
        for &job in &jobs {
            self.dashboard.run(job);
        }
        jobs.len()
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('o') => {
                let result = self.dashboard.set_power(true);
                self.report(result, "LED on");
            }
            KeyCode::Char('f') => {
                let result = self.dashboard.set_power(false);
                self.report(result, "LED off");
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_brightness(BRIGHTNESS_STEP),
            KeyCode::Char('-') => self.step_brightness(-BRIGHTNESS_STEP),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.select_preset(index);
            }
            KeyCode::Char('p') => self.toggle_pause(),
            _ => {}
        }
    }

    fn step_brightness(&mut self, delta: i16) {
        let next = self.dashboard.led().brightness.step(delta);
        let label = self.dashboard.set_brightness_level(next);
        self.status = Some(Status::Info(format!("Brightness {label}")));
    }

    fn select_preset(&mut self, index: usize) {
        let Some(preset) = self.dashboard.presets().get(index).cloned() else {
            self.status = Some(Status::Error(format!("No preset {}", index + 1)));
            return;
        };
        self.dashboard.set_led_color(preset.color);
        self.status = Some(Status::Info(format!(
            "Preset {} ({})",
            preset.name, preset.color
        )));
    }

    fn toggle_pause(&mut self) {
        if self.paused {
            if let Err(e) = self.scheduler.start(Instant::now()) {
                self.status = Some(Status::Error(e.to_string()));
                return;
            }
            self.paused = false;
            self.status = Some(Status::Info("Refresh resumed".to_string()));
        } else {
            self.scheduler.stop();
            self.paused = true;
            self.status = Some(Status::Info("Refresh paused".to_string()));
        }
    }

    fn report(&mut self, result: Result<(), DashboardError>, ok: &str) {
        self.status = Some(match result {
            Ok(()) => Status::Info(ok.to_string()),
            Err(e) => Status::Error(e.to_string()),
        });
    }

    // -----------------------------------------------------------------------
    // Accessors for the UI
    // -----------------------------------------------------------------------

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }
    pub fn is_paused(&self) -> bool {
        self.paused
    }
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piworld_core::{DashboardConfig, LedCommand, LedState, RefreshJob, SchedulerState};

    fn app() -> App {
        let mut dashboard = Dashboard::simulated(DashboardConfig::default(), Some(11));
        let scheduler = dashboard.initialize().unwrap();
        App::new(dashboard, scheduler)
    }

    #[test]
    fn power_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('o'));
        assert!(app.dashboard().led().on);
        assert!(app.dashboard().preview().glow);
        assert_eq!(app.status(), Some(&Status::Info("LED on".into())));

        app.handle_key(KeyCode::Char('f'));
        assert!(!app.dashboard().led().on);
        assert_eq!(app.dashboard().preview().box_shadow, "none");
    }

    #[test]
    fn brightness_keys_saturate() {
        let mut app = app();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.dashboard().led().brightness.percent(), 100);

        for _ in 0..3 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.dashboard().brightness_label(), "85%");

        for _ in 0..30 {
            app.handle_key(KeyCode::Char('-'));
        }
        assert_eq!(app.dashboard().led().brightness.percent(), 0);
    }

    #[test]
    fn digit_selects_preset() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.dashboard().led().color.to_string(), "#00ff00");
        assert_eq!(app.dashboard().picker_color().to_string(), "#00ff00");

        app.handle_key(KeyCode::Char('9'));
        assert!(matches!(app.status(), Some(Status::Error(_))));
        assert_eq!(app.dashboard().led().color.to_string(), "#00ff00");
    }

    #[test]
    fn pause_stops_refresh() {
        let mut app = app();
        let t0 = Instant::now();
        app.scheduler.start(t0).unwrap();

        app.handle_key(KeyCode::Char('p'));
        assert!(app.is_paused());
        assert_eq!(app.scheduler.state(), SchedulerState::Stopped);
        assert_eq!(app.tick(t0 + Duration::from_secs(10)), 0);

        app.handle_key(KeyCode::Char('p'));
        assert!(!app.is_paused());
        assert!(app.scheduler.is_running());
    }

    #[test]
    fn tick_runs_due_jobs() {
        let mut app = app();
        let t0 = Instant::now();
        app.scheduler.start(t0).unwrap();
        assert_eq!(app.tick(t0 + Duration::from_millis(1999)), 0);
        assert_eq!(app.tick(t0 + Duration::from_millis(2000)), 1);
        assert_eq!(app.tick(t0 + Duration::from_millis(5000)), 2);
        assert_eq!(app.dashboard().snapshot().sensor_refreshes, 3);
        assert_eq!(app.dashboard().snapshot().system_refreshes, 2);
        assert_eq!(
            app.scheduler.period(RefreshJob::Sensors),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn actuator_failure_shows_error() {
        struct Broken;
        impl piworld_core::LedActuator for Broken {
            fn send(&mut self, _: LedCommand, _: &LedState) -> Result<(), DashboardError> {
                Err(DashboardError::Actuator("gpio busy".into()))
            }
        }
        let mut dashboard = Dashboard::new(
            DashboardConfig::default(),
            Box::new(piworld_core::SimulatedTelemetry::seeded(1)),
            Box::new(Broken),
        );
        let scheduler = dashboard.initialize().unwrap();
        let mut app = App::new(dashboard, scheduler);
        app.handle_key(KeyCode::Char('o'));
        assert!(app.dashboard().led().on);
        assert!(matches!(app.status(), Some(Status::Error(msg)) if msg.contains("gpio busy")));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Esc);
        assert!(!app.running);
    }
}
