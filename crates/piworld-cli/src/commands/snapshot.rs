use super::DashboardOptions;

pub fn run(options: DashboardOptions) {
    let mut dashboard = super::make_dashboard(options);
    let mut scheduler = match dashboard.initialize() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    scheduler.dispose();

    match serde_json::to_string_pretty(&dashboard.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing snapshot: {e}");
            std::process::exit(1);
        }
    }
}
