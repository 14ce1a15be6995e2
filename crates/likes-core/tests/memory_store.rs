#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeSet;
use std::sync::Arc;

use likes_core::{CounterService, MemoryStore};

fn service() -> (Arc<MemoryStore>, CounterService) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), CounterService::new(store))
}

#[tokio::test]
async fn increments_then_reads_back() {
    let (_, svc) = service();

    assert_eq!(svc.increment("blog-123").await.unwrap(), 1);
    assert_eq!(svc.increment("blog-123").await.unwrap(), 2);
    assert_eq!(svc.get("blog-123").await.unwrap(), 2);
    assert_eq!(svc.get("blog-999").await.unwrap(), 0);
}

#[tokio::test]
async fn count_equals_number_of_increments() {
    let (_, svc) = service();
    for n in 1..=25u64 {
        let v = svc.increment("post/hello").await.unwrap();
        assert_eq!(v, n);
        // read-your-write
        assert!(svc.get("post/hello").await.unwrap() >= v);
    }
    assert_eq!(svc.get("post/hello").await.unwrap(), 25);
}

#[tokio::test]
async fn unknown_slug_reads_zero_without_creating_a_record() {
    let (store, svc) = service();

    assert_eq!(svc.get("never-liked").await.unwrap(), 0);
    assert!(store.is_empty());
    assert_eq!(svc.increment("never-liked").await.unwrap(), 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn slugs_are_independent() {
    let (_, svc) = service();

    for _ in 0..3 {
        svc.increment("a").await.unwrap();
    }
    svc.increment("b").await.unwrap();

    assert_eq!(svc.get("a").await.unwrap(), 3);
    assert_eq!(svc.get("b").await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_return_each_value_exactly_once() {
    let (_, svc) = service();
    let n = 200u64;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.increment("hot-post").await.unwrap() })
        })
        .collect();

    let mut seen = BTreeSet::new();
    for h in handles {
        assert!(seen.insert(h.await.unwrap()), "duplicate post-increment value");
    }

    assert_eq!(seen, (1..=n).collect::<BTreeSet<_>>());
    assert_eq!(svc.get("hot-post").await.unwrap(), n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ten_workers_ten_increments_each() {
    let (_, svc) = service();

    let workers: Vec<_> = (0..10)
        .map(|_| {
            let svc = svc.clone();
            tokio::spawn(async move {
                for _ in 0..10 {
                    svc.increment("post/current-test").await.unwrap();
                }
            })
        })
        .collect();
    for w in workers {
        w.await.unwrap();
    }

    assert_eq!(svc.get("post/current-test").await.unwrap(), 100);
}
