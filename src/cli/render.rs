use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::render::Renderer;

pub fn run(path: &str, sets: &[String], config: Option<String>) -> Result<()> {
    let file = Path::new(path);
    if !file.exists() {
        bail!("File not found: {}", path);
    }
    if !file.is_file() {
        bail!("Path is not a file: {}", path);
    }

    let content = fs::read_to_string(file)?;
    let config = Config::load_with_path(config)?;
    let renderer = Renderer::with_options(config.render_options());

    // No bindings means default preview; any --set switches to bound mode.
    let bindings = if sets.is_empty() {
        None
    } else {
        Some(parse_bindings(sets)?)
    };

    let preview = renderer.render_preview(&content, bindings.as_ref())?;
    print!("{}", preview);

    Ok(())
}

fn parse_bindings(sets: &[String]) -> Result<HashMap<String, String>> {
    let mut bindings = HashMap::new();
    for pair in sets {
        match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                bindings.insert(name.trim().to_string(), value.to_string());
            }
            _ => bail!("Invalid binding '{}': expected NAME=VALUE", pair),
        }
    }
    Ok(bindings)
}
