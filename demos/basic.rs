/// Basic example demonstrating envelope creation, verification and extraction
///
/// Run with: cargo run --example basic
use loaf_rs::{CancellationToken, InputSource, LoafConfig, Pipeline};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== loaf-rs Basic Example ===\n");

    let pipeline = Pipeline::new(LoafConfig::default())?;
    let token = CancellationToken::none();

    // Create an envelope
    println!("1. Creating envelope...");
    let created = pipeline.create(InputSource::text("Hello, World!"), &token)?;
    if !created.succeeded {
        return Err("create failed".into());
    }
    let line = created.payload;
    println!("   ✓ {} characters", line.len());
    println!("   {}...", &line[..line.len().min(72)]);

    // Verify the embedded digest
    println!("\n2. Verifying envelope...");
    let verified = pipeline.verify(&line, &token)?;
    println!("   Parsed: {}", verified.succeeded);
    println!("   Digest matches: {}", verified.payload);

    // Tampering with the payload breaks the digest
    let flipped = if line.ends_with('0') { '1' } else { '0' };
    let tampered = format!("{}{}", &line[..line.len() - 1], flipped);
    let tampered_check = pipeline.verify(&tampered, &token)?;
    println!("   Tampered copy matches: {}", tampered_check.payload);

    // Extract the blobs
    println!("\n3. Extracting envelope...");
    let extracted = pipeline.extract(&line, &token)?;
    if !extracted.succeeded {
        return Err("extract failed".into());
    }
    for blob in &extracted.payload {
        println!(
            "     - {} ({} bytes): {}",
            blob.name,
            blob.bytes.len(),
            String::from_utf8_lossy(&blob.bytes)
        );
    }

    println!("\n✓ Example complete!");
    Ok(())
}
