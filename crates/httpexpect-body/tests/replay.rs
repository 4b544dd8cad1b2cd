//! Replay behaviour of `BodyWrapper` over sources that yield asynchronously.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{StreamExt, stream};
use httpexpect_body::{BodyWrapper, ByteStream};

/// Source that sleeps before every chunk, like a slow network body.
fn slow_source(payload: &'static [u8], chunk: usize) -> ByteStream {
    let chunks: Vec<Bytes> = payload.chunks(chunk).map(Bytes::from_static).collect();
    Box::pin(stream::iter(chunks).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok::<_, io::Error>(chunk)
    }))
}

#[tokio::test]
async fn test_two_readers_yield_same_bytes() {
    let payload: &'static [u8] = b"the quick brown fox jumps over the lazy dog";
    let body = BodyWrapper::new(slow_source(payload, 5));

    let mut a = body.materialize().await.unwrap();
    let mut b = body.materialize().await.unwrap();

    let mut head = [0u8; 9];
    a.read_exact(&mut head).unwrap();
    assert_eq!(&head, b"the quick");

    let mut all_b = Vec::new();
    b.read_to_end(&mut all_b).unwrap();
    assert_eq!(all_b, payload);

    let mut rest_a = Vec::new();
    a.read_to_end(&mut rest_a).unwrap();
    assert_eq!(rest_a, &payload[9..]);
}

#[tokio::test]
async fn test_close_then_replay_many_times() {
    let fired = Arc::new(AtomicUsize::new(0));
    let hook = fired.clone();
    let body = BodyWrapper::new(slow_source(b"replayable", 3)).with_cancel_hook(move || {
        hook.fetch_add(1, Ordering::SeqCst);
    });

    body.close().await.unwrap();
    body.close().await.unwrap();

    for _ in 0..5 {
        let reader = body.materialize().await.unwrap();
        assert_eq!(reader.to_bytes(), Bytes::from_static(b"replayable"));
    }
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_first_touch_drains_once() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let counter = pulls.clone();
    let source: ByteStream = Box::pin(stream::iter(0..16u8).map(move |i| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, io::Error>(Bytes::from(vec![i]))
    }));
    let body = Arc::new(BodyWrapper::new(source));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let body = body.clone();
        tasks.push(tokio::spawn(async move { body.bytes().await.unwrap() }));
    }
    let expected: Vec<u8> = (0..16).collect();
    for task in tasks {
        assert_eq!(task.await.unwrap().as_ref(), expected.as_slice());
    }
    assert_eq!(pulls.load(Ordering::SeqCst), 16);
}
