//! Generate seed corpus for fuzzing

use loaf_rs::{CancellationToken, ContainerWriter, InputSource, LoafConfig, Pipeline};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let envelope_dir = "fuzz/corpus/fuzz_envelope";
    let container_dir = "fuzz/corpus/fuzz_container_read";
    fs::create_dir_all(envelope_dir)?;
    fs::create_dir_all(container_dir)?;

    println!("Generating seed corpus...");

    let pipeline = Pipeline::new(LoafConfig::default().with_modification_time(0))?;
    let token = CancellationToken::none();

    let seeds: Vec<(&str, Vec<u8>)> = vec![
        ("empty", Vec::new()),
        ("hello", b"Hello, World!".to_vec()),
        ("large", b"This is test data for compression. ".repeat(1000)),
        ("binary", (0..=255).collect()),
        ("block", vec![0xAB; 512]),
    ];

    for (name, data) in &seeds {
        let created = pipeline.create(InputSource::bytes(*name, data.clone()), &token);
        if let Ok(result) = created {
            let path = format!("{}/seed_{}.txt", envelope_dir, name);
            fs::write(&path, result.payload)?;
            println!("✓ Generated: {}", path);
        }

        let container = ContainerWriter::new()
            .with_modified_time(0)
            .write(name, data, &token)?;
        let path = format!("{}/seed_{}.tar", container_dir, name);
        fs::write(&path, container)?;
        println!("✓ Generated: {}", path);
    }

    println!("\nGenerated {} seeds per target", seeds.len());
    Ok(())
}
