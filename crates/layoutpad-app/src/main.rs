//! Main application entry point (native).

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
fn main() {
    use clap::Parser;
    use layoutpad_app::{run_command, Cli, DialogSink, DirectorySink, FileSink};
    use layoutpad_core::storage::{create_default_store, FileStore};
    use layoutpad_core::Editor;

    env_logger::init();

    let (config, command) = match Cli::parse().into_parts() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    log::info!("Starting {}", config.title);

    let store = match &config.data_dir {
        Some(dir) => FileStore::new(dir.clone()),
        None => create_default_store(),
    };
    let store = match store {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open layout storage: {}", e);
            std::process::exit(1);
        }
    };

    let mut sink: Box<dyn FileSink> = match &config.out_dir {
        Some(dir) => Box::new(DirectorySink::new(dir.clone())),
        None => Box::new(DialogSink),
    };

    let mut editor = Editor::open(store, config.editor);
    let mut stdout = std::io::stdout();
    if let Err(e) = run_command(&mut editor, command, sink.as_mut(), &mut stdout) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(all(feature = "native", not(target_arch = "wasm32"))))]
fn main() {
    eprintln!("Native feature not enabled. Use `cargo run --features native`");
}
