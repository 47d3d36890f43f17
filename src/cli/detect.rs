use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::detect::Detector;

pub fn run(path: &str, json: bool, config: Option<String>) -> Result<()> {
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
    let detections = detector.detect(&content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detections)?);
    } else if detections.is_empty() {
        println!("No unsupported placeholder patterns found");
    } else {
        for detection in &detections {
            println!(
                "{}..{}: {} `{}` -> {}",
                detection.start,
                detection.end,
                detection.kind,
                detection.original,
                detection.to_supported_format()
            );
        }
    }

    if !detections.is_empty() {
        bail!(
            "{} unsupported placeholder pattern(s) found",
            detections.len()
        );
    }

    Ok(())
}
