use platform_adapters::{AdapterRegistry, PageDocument};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("platform_adapters=debug")
        .init();

    let mut args = env::args().skip(1);
    let (url, path) = match (args.next(), args.next()) {
        (Some(url), Some(path)) => (url, path),
        _ => {
            println!("Usage: extract_file <page-url> <saved-html-file>");
            return Ok(());
        }
    };

    println!("=== Page Extraction Test ===\n");
    println!("Platform: {}", AdapterRegistry::detect(&url));

    let html = std::fs::read_to_string(&path)?;
    let page = PageDocument::parse(url, &html);
    let content = AdapterRegistry::extract(&page)?;

    match content.preview() {
        Some(preview) => println!("✅ Content found:\n{}\n", preview),
        None => println!("❌ No post content found"),
    }

    if let Some(metadata) = &content.metadata {
        println!("Metadata:");
        println!("{}", serde_json::to_string_pretty(metadata)?);
    }

    Ok(())
}
