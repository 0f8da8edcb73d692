#![no_main]

use libfuzzer_sys::fuzz_target;
use loaf_rs::{CancellationToken, ContainerReader};

fuzz_target!(|data: &[u8]| {
    // Reading arbitrary bytes must never panic, however odd the size fields
    let blobs = match ContainerReader::new(data).read_all(&CancellationToken::none()) {
        Ok(b) => b,
        Err(_) => return,
    };

    let total: usize = blobs.iter().map(|b| b.bytes.len()).sum();
    assert!(total <= data.len());
});
