use std::io;

const LOG_FILE: &str = "dairy-ledger.log";

const NOISY_TARGETS: [&str; 5] = ["wgpu_core", "wgpu_hal", "iced_wgpu", "naga", "cosmic_text"];

pub fn setup(is_debug: bool) -> Result<(), fern::InitError> {
    let level = if is_debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level);

    for target in NOISY_TARGETS {
        dispatch = dispatch.level_for(target, log::LevelFilter::Warn);
    }

    if is_debug {
        dispatch.chain(io::stdout()).apply()?;
    } else {
        let path = data::data_path(Some(LOG_FILE));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        dispatch.chain(fern::log_file(path)?).apply()?;
    }

    Ok(())
}
