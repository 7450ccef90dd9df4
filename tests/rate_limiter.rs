use dayboard::api::clickup::RateLimiter;
use std::time::{Duration, Instant};

#[tokio::test]
async fn calls_under_the_limit_do_not_block() {
    let limiter = RateLimiter::new(3, Duration::from_millis(300));

    let started = Instant::now();
    limiter.acquire().await;
    limiter.acquire().await;
    limiter.acquire().await;
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn the_call_over_the_limit_blocks_until_the_window_rolls() {
    let limiter = RateLimiter::new(3, Duration::from_millis(300));

    let first_call = Instant::now();
    limiter.acquire().await;
    limiter.acquire().await;
    limiter.acquire().await;

    // The window is full; this must wait until it has elapsed since the
    // first call of the window.
    limiter.acquire().await;
    assert!(first_call.elapsed() >= Duration::from_millis(290));
}

#[tokio::test]
async fn the_window_keeps_rolling_after_a_blocked_call() {
    let limiter = RateLimiter::new(2, Duration::from_millis(200));

    limiter.acquire().await;
    limiter.acquire().await;
    limiter.acquire().await; // waited for the window

    let after_roll = Instant::now();
    limiter.acquire().await; // one free slot remains in the new window
    assert!(after_roll.elapsed() < Duration::from_millis(150));
}
