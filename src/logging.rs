use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use env_logger::Target;

/// Route the log facade to a file in the data dir. Logging to stderr would
/// corrupt the alternate-screen TUI, so the pipe target is unconditional.
/// Level comes from QUIZDR_LOG (default: warn).
pub fn init() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizdr");
    fs::create_dir_all(&dir)?;
    let path = dir.join("quizdr.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(env_logger::Env::new().filter_or("QUIZDR_LOG", "warn"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(path)
}
