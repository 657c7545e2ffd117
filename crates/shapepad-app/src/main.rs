//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Shapepad");

    let config = shapepad_app::AppConfig::load_or_default();
    if let Err(e) = shapepad_app::App::with_config(config).run() {
        log::error!("Shapepad exited with an error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
