// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::path::Path;

use log::debug;
use serde::Serialize;

/// Helper to read JSON input files
pub async fn read_input(file_name: &str) -> anyhow::Result<serde_json::Value> {
    debug!("Reading input from '{}'", file_name);

    let s = tokio::fs::read_to_string(file_name).await?;

    // Determine format from file name
    let p = Path::new(file_name);

    // Decode based on input extension
    let v = match p.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&s)?,
        _ => return Err(anyhow::anyhow!("unsupported input file format")),
    };

    Ok(v)
}

/// Helper to write output, to file if `--output` argument is provided or stdout otherwise
pub async fn write_output(file_name: Option<&str>, value: &impl Serialize) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;

    let file_name = match file_name {
        Some(f) => f,
        None => {
            println!("{s}");
            return Ok(());
        }
    };

    debug!("Writing output to '{}'", file_name);

    // Determine format from file name
    let p = Path::new(file_name);
    match p.extension().and_then(|e| e.to_str()) {
        Some("json") => tokio::fs::write(p, s).await?,
        _ => return Err(anyhow::anyhow!("unsupported output file format")),
    }

    Ok(())
}
