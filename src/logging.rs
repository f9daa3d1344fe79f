use log::LevelFilter;
use std::fs::File;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LoggingError {
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Install(#[from] log::SetLoggerError),
}

/// Send log records at `level` and above to `path`.
///
/// The terminal belongs to the TUI, so nothing is written to stderr.
/// `LevelFilter::Off` installs nothing and leaves no file behind.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let file = File::create(path)?;
    simplelog::WriteLogger::init(level, config, file)?;
    Ok(())
}
