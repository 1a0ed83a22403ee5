use super::DashboardOptions;

pub fn run(host: &str, port: u16, options: DashboardOptions) {
    let dashboard = super::make_dashboard(options);
    let base = format!("http://{host}:{port}");

    println!("🍓 Pi World Dashboard v{}", piworld_core::VERSION);
    println!("   {base}");
    println!(
        "   sensors every {}ms, system info every {}ms",
        options.sensor_interval_ms, options.system_interval_ms
    );
    println!();
    println!("   Endpoints:");
    println!("     GET  /                 Dashboard page");
    println!("     GET  /api              API index");
    println!("     GET  /api/dashboard    Full dashboard snapshot");
    println!("     GET  /api/sensors      Latest sensor readings");
    println!("     GET  /api/system       Uptime, load average, last update");
    println!("     GET  /api/led          LED state and preview");
    println!("     POST /api/led          Update {{on?, color?, brightness?}}");
    println!("     POST /api/led/power    {{\"on\": true|false}}");
    println!("     POST /api/led/preset   {{\"color\": \"#00ff00\"}} or {{\"name\": \"green\"}}");
    println!("     POST /api/control      Raw control event");
    println!("     GET  /api/presets      Preset colors");
    println!("     GET  /health           Health check");
    println!();
    println!("   Examples:");
    println!("     curl {base}/api/sensors");
    println!(
        "     curl -X POST -H 'content-type: application/json' -d '{{\"on\":true}}' {base}/api/led/power"
    );
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(piworld_server::run_server(dashboard, host, port)) {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
