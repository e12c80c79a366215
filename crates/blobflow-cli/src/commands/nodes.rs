use anyhow::Result;

use blobflow_nodes::NodeRegistry;

pub fn run() -> Result<()> {
    let registry = NodeRegistry::with_blob_nodes();
    println!("Registered node types:");
    for def in registry.definitions() {
        let fields: Vec<&str> = def.credential_fields.iter().map(|f| f.as_str()).collect();
        println!(
            "  - \"{}\" (default name \"{}\", credentials: {})",
            def.type_name,
            def.default_name,
            fields.join(", ")
        );
    }
    Ok(())
}
