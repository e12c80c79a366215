use anyhow::Result;
use std::path::Path;

use blobflow_core::config::FlowConfig;

pub fn run(base_dir: &Path) -> Result<()> {
    println!("Initializing blobflow in {}", base_dir.display());

    std::fs::create_dir_all(base_dir)?;

    let config_path = FlowConfig::default_path(base_dir);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    FlowConfig::default_config().save(&config_path)?;
    println!("Created config: {}", config_path.display());

    println!("\nNext steps:");
    println!(
        "  1. Set accountname/key under [blob_storage] in {}",
        config_path.display()
    );
    println!("  2. Run `blobflow send upload-blob --payload <file> --container <name>`");

    Ok(())
}
