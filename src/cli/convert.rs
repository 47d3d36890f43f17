use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use tracing::debug;

use crate::config::Config;
use crate::detect::Detector;

pub fn run(path: &str, write: bool, config: Option<String>) -> Result<()> {
    let file = Path::new(path);
    if !file.exists() {
        bail!("File not found: {}", path);
    }
    if !file.is_file() {
        bail!("Path is not a file: {}", path);
    }

    let content = fs::read_to_string(file)?;
    let config = Config::load_with_path(config)?;
    let detector = Detector::with_options(config.detect_options());
    let converted = detector.convert_all(&content)?;

    if write {
        if converted == content {
            println!("{} already uses supported placeholders", path);
        } else {
            fs::write(file, &converted)?;
            debug!("rewrote {}", path);
            println!("Updated {}", path);
        }
        return Ok(());
    }

    print!("{}", converted);
    Ok(())
}
