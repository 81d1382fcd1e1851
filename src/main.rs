mod app;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("UMLSKETCH_LOG", "warn"))
        .init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "UML Sketch",
        native_options,
        Box::new(|cc| Ok(Box::new(app::DiagramApp::new(cc)))),
    )
}
