use std::sync::Arc;
use std::time::Duration;

use snip_ratelimit::{ManualClock, RateLimitSettings, RateLimiterRegistry};

fn settings() -> RateLimitSettings {
    RateLimitSettings::builder()
        .rate(2)
        .period(Duration::from_secs(1))
        .sweep_interval(Duration::from_millis(20))
        .inactivity_threshold(Duration::from_secs(180))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sweeper_evicts_idle_clients_in_the_background() {
    let clock = ManualClock::default();
    let registry = Arc::new(RateLimiterRegistry::with_clock(settings(), clock.clone()));
    let sweeper = registry.spawn_sweeper();

    registry.allow("192.0.2.1");
    registry.allow("192.0.2.2");
    assert_eq!(registry.tracked_clients(), 2);

    clock.advance(Duration::from_secs(181));

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(10))
        .until_async(|| async { registry.tracked_clients() == 0 })
        .await;

    sweeper.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sweeper_keeps_active_clients() {
    let clock = ManualClock::default();
    let registry = Arc::new(RateLimiterRegistry::with_clock(settings(), clock.clone()));
    let sweeper = registry.spawn_sweeper();

    registry.allow("idle");
    clock.advance(Duration::from_secs(100));
    registry.allow("active");
    clock.advance(Duration::from_secs(100));

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(10))
        .until_async(|| async { registry.tracked_clients() == 1 })
        .await;

    // the survivor still has its quota state
    assert!(registry.allow("active"));
    assert!(!registry.allow("active"));

    sweeper.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_the_task() {
    let registry = Arc::new(RateLimiterRegistry::new(settings()));
    let sweeper = registry.spawn_sweeper();
    assert!(!sweeper.is_finished());

    tokio::time::timeout(Duration::from_secs(5), sweeper.shutdown())
        .await
        .unwrap();

    // only the test still holds the registry once the task is gone
    assert_eq!(Arc::strong_count(&registry), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_the_handle_aborts_the_task() {
    let registry = Arc::new(RateLimiterRegistry::new(settings()));
    let sweeper = registry.spawn_sweeper();
    drop(sweeper);

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(10))
        .until_async(|| async { Arc::strong_count(&registry) == 1 })
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clients_get_independent_quotas() {
    let clock = ManualClock::default();
    let registry = Arc::new(RateLimiterRegistry::with_clock(settings(), clock));
    let mut handles = Vec::new();

    for i in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            let client = format!("10.0.0.{i}");
            (0..5).filter(|_| registry.allow(&client)).count()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 2);
    }
    assert_eq!(registry.tracked_clients(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_from_one_client_share_its_bucket() {
    let clock = ManualClock::default();
    let settings = RateLimitSettings::builder()
        .rate(25)
        .period(Duration::from_secs(1))
        .build();
    let registry = Arc::new(RateLimiterRegistry::with_clock(settings, clock));
    let mut handles = Vec::new();

    for _ in 0..10 {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            (0..10).filter(|_| registry.allow("shared")).count()
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        allowed += handle.await.unwrap();
    }
    assert_eq!(allowed, 25);
}
