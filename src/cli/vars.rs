use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::variables::extract_variables;

pub fn run(path: &str, json: bool) -> Result<()> {
    let file = Path::new(path);
    if !file.exists() {
        bail!("File not found: {}", path);
    }
    if !file.is_file() {
        bail!("Path is not a file: {}", path);
    }

    let content = fs::read_to_string(file)?;
    let variables = extract_variables(&content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&variables)?);
        return Ok(());
    }

    if variables.is_empty() {
        println!("No variables found");
        return Ok(());
    }

    for variable in &variables {
        if variable.has_default() {
            println!("{} (default: {})", variable.name, variable.default);
        } else {
            println!("{}", variable.name);
        }
    }

    Ok(())
}
