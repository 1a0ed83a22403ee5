use super::DashboardOptions;

pub fn run(options: DashboardOptions) {
    let mut dashboard = super::make_dashboard(options);
    let scheduler = match dashboard.initialize() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let mut app = crate::tui::app::App::new(dashboard, scheduler);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
