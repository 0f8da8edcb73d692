//! Concurrency and cancellation
//!
//! Pipelines are stateless, so independent threads may share one. The
//! dispatcher must let only the newest submission publish.

use loaf_rs::{
    CancellationToken, Cancelled, Dispatcher, InputSource, LoafConfig, NamedBlob, OpResult,
    Pipeline, Request, Response,
};
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn pipeline() -> Pipeline {
    Pipeline::new(LoafConfig::default().with_modification_time(0)).unwrap()
}

/// Reader that trips a token after a number of reads
struct CancellingReader {
    remaining: usize,
    token: CancellationToken,
    reads: Arc<AtomicUsize>,
}

impl Read for CancellingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.remaining == 0 {
            self.token.cancel();
        } else {
            self.remaining -= 1;
        }
        buf[0] = b'x';
        Ok(1)
    }
}

/// Reader that dribbles bytes slowly so a job stays in flight
struct SlowReader {
    chunks: usize,
}

impl Read for SlowReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.chunks == 0 {
            return Ok(0);
        }
        self.chunks -= 1;
        thread::sleep(Duration::from_millis(5));
        buf[0] = b's';
        Ok(1)
    }
}

#[test]
fn test_shared_pipeline_across_threads() {
    let shared = Arc::new(pipeline());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let p = Arc::clone(&shared);
            thread::spawn(move || {
                let token = CancellationToken::none();
                let text = format!("thread {} payload", i);
                let envelope = p.create(InputSource::text(text.clone()), &token).unwrap().payload;

                assert_eq!(p.verify(&envelope, &token).unwrap(), OpResult::ok(true));
                let blobs = p.extract(&envelope, &token).unwrap().payload;
                assert_eq!(blobs, vec![NamedBlob::new("-", text.into_bytes())]);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_cancellation_during_input_read() {
    let token = CancellationToken::new();
    let reads = Arc::new(AtomicUsize::new(0));
    let reader = CancellingReader {
        remaining: 3,
        token: token.clone(),
        reads: Arc::clone(&reads),
    };

    let outcome = pipeline().create(InputSource::reader("endless", reader), &token);
    assert_eq!(outcome, Err(Cancelled));
    // Aborted promptly after the token tripped
    assert!(reads.load(Ordering::SeqCst) <= 5);
}

#[test]
fn test_cancelled_is_distinct_from_failure() {
    let token = CancellationToken::new();
    token.cancel();

    let p = pipeline();
    assert_eq!(p.verify("not a valid loaf format", &token), Err(Cancelled));
    assert_eq!(
        p.verify("not a valid loaf format", &CancellationToken::none()),
        Ok(OpResult::failed())
    );
}

#[test]
fn test_dispatcher_publishes_latest_only() {
    let dispatcher = Dispatcher::new(pipeline());

    // Keystroke-style burst: each submit supersedes the previous one
    let mut last_generation = 0;
    for i in 0..10 {
        let slow = SlowReader { chunks: 50 };
        let request = if i < 9 {
            Request::Create(InputSource::reader(format!("draft-{}", i), slow))
        } else {
            Request::Create(InputSource::text("final"))
        };
        last_generation = dispatcher.submit(request);
    }
    dispatcher.wait();

    let published = dispatcher.latest().unwrap();
    assert_eq!(published.generation, last_generation);

    let envelope = match published.response {
        Response::Created(result) => {
            assert!(result.succeeded);
            result.payload
        }
        other => panic!("Expected Created, got: {:?}", other),
    };

    let blobs = pipeline()
        .extract(&envelope, &CancellationToken::none())
        .unwrap()
        .payload;
    assert_eq!(blobs, vec![NamedBlob::new("-", b"final".to_vec())]);
}

#[test]
fn test_dispatcher_mixed_requests() {
    let dispatcher = Dispatcher::new(pipeline());
    let envelope = pipeline()
        .create(InputSource::text("mixed"), &CancellationToken::none())
        .unwrap()
        .payload;

    dispatcher.submit(Request::Verify(envelope.clone()));
    dispatcher.wait();
    assert_eq!(
        dispatcher.latest().unwrap().response,
        Response::Verified(OpResult::ok(true))
    );

    dispatcher.submit(Request::Extract(envelope));
    dispatcher.wait();
    assert_eq!(
        dispatcher.latest().unwrap().response,
        Response::Extracted(OpResult::ok(vec![NamedBlob::new("-", b"mixed".to_vec())]))
    );
}

#[test]
fn test_dispatcher_cancel_keeps_previous_result() {
    let dispatcher = Dispatcher::new(pipeline());

    let first = dispatcher.submit(Request::Verify("garbage".to_string()));
    dispatcher.wait();

    dispatcher.submit(Request::Create(InputSource::reader(
        "slow",
        SlowReader { chunks: 1000 },
    )));
    dispatcher.cancel();
    dispatcher.wait();

    let published = dispatcher.latest().unwrap();
    assert_eq!(published.generation, first);
    assert_eq!(published.response, Response::Verified(OpResult::failed()));
}
