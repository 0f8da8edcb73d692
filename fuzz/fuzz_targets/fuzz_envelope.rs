#![no_main]

use libfuzzer_sys::fuzz_target;
use loaf_rs::{is_envelope, CancellationToken, Pipeline, ENVELOPE_PREFIX};

fuzz_target!(|data: &[u8]| {
    // Envelopes are text; skip inputs that are not UTF-8
    let text = match std::str::from_utf8(data) {
        Ok(t) => t,
        Err(_) => return,
    };

    let pipeline = Pipeline::default();
    let token = CancellationToken::none();

    // Neither operation may panic or report cancellation
    let verified = pipeline.verify(text, &token).expect("not cancelled");
    let extracted = pipeline.extract(text, &token).expect("not cancelled");

    // Failed results carry default payloads
    if !verified.succeeded {
        assert!(!verified.payload);
    }
    if !extracted.succeeded {
        assert!(extracted.payload.is_empty());
    }

    // Detection ignores case but parsing does not; lowercase hits must parse
    let trimmed = text.trim();
    let lowercase_body = trimmed.starts_with(ENVELOPE_PREFIX)
        && !trimmed[ENVELOPE_PREFIX.len()..].bytes().any(|b| b.is_ascii_uppercase());
    if is_envelope(text) && lowercase_body {
        assert!(verified.succeeded);
    }
});
