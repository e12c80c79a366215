use anyhow::Result;
use std::path::Path;

use blobflow_core::config::FlowConfig;
use blobflow_core::config::credentials::CredentialField;

pub fn run(base_dir: &Path) -> Result<()> {
    let config_path = FlowConfig::default_path(base_dir);
    let config = FlowConfig::load(&config_path)?.with_env_fallback();

    println!("Config: {}", config_path.display());
    println!();

    match config.blob_storage {
        Some(ref section) => {
            println!(
                "  Fallback account: {}",
                section.accountname.as_deref().unwrap_or("(unset)")
            );
            println!("  Fallback key:     {}", redact(section.key.as_deref()));
        }
        None => println!("  No [blob_storage] fallback configured."),
    }
    println!();

    if config.nodes.is_empty() {
        println!("  No nodes configured.");
        return Ok(());
    }

    println!("  Nodes ({}):", config.nodes.len());
    for node in &config.nodes {
        println!(
            "    - {} ({}, name=\"{}\", send_error={}, failure_reporting={})",
            node.id,
            node.kind,
            node.display_name(),
            node.send_error,
            node.failure_reporting
        );
        for field in CredentialField::ALL {
            let value = node.credentials.get(field);
            let shown = match field {
                CredentialField::Key => redact(value).to_string(),
                _ => value.unwrap_or("").to_string(),
            };
            if !shown.is_empty() {
                println!("        {field} = {shown}");
            }
        }
    }

    Ok(())
}

fn redact(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "[REDACTED]",
        _ => "",
    }
}
