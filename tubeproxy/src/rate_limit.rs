use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response}
};

use crate::error::AppError;

static RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
static RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
static RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Number of tracked clients above which expired windows are swept.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32, reset_after: Duration },
    Limited { reset_after: Duration }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32
}

/// Fixed-window request counter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_proxy_headers: bool,
    windows: Mutex<HashMap<IpAddr, Window>>
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, trust_proxy_headers: bool) -> Self {
        Self {
            max_requests,
            window,
            trust_proxy_headers,
            windows: Mutex::new(HashMap::new())
        }
    }

    pub fn check(&self, key: IpAddr) -> Decision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: IpAddr, now: Instant) -> Decision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(key).or_insert(Window { started: now, count: 0 });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        let reset_after = self.window.saturating_sub(now.duration_since(entry.started));

        if entry.count >= self.max_requests {
            Decision::Limited { reset_after }
        } else {
            entry.count += 1;
            Decision::Allowed {
                remaining: self.max_requests - entry.count,
                reset_after
            }
        }
    }

    fn client_ip(&self, request: &Request) -> IpAddr {
        if self.trust_proxy_headers
            && let Some(ip) = forwarded_ip(request.headers())
        {
            return ip;
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| addr.ip())
    }
}

/// Middleware rejecting requests over the limit before they reach a handler.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next
) -> Response {
    let ip = limiter.client_ip(&request);

    match limiter.check(ip) {
        Decision::Allowed { remaining, reset_after } => {
            let mut response = next.run(request).await;
            insert_headers(response.headers_mut(), limiter.max_requests, remaining, reset_after);
            response
        }
        Decision::Limited { reset_after } => {
            let retry_after = ceil_secs(reset_after);
            tracing::warn!(%ip, path = %request.uri().path(), "rate limit exceeded");
            let mut response = AppError::rate_limited(limiter.max_requests, retry_after).into_response();
            insert_headers(response.headers_mut(), limiter.max_requests, 0, reset_after);
            response
        }
    }
}

fn insert_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_after: Duration) {
    headers.insert(RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(RATELIMIT_REMAINING.clone(), HeaderValue::from(remaining));
    headers.insert(RATELIMIT_RESET.clone(), HeaderValue::from(ceil_secs(reset_after)));
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = if duration.subsec_nanos() > 0 {
        duration.as_secs() + 1
    } else {
        duration.as_secs()
    };
    secs.max(1)
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let check_header = |key: &str| {
        headers
            .get(key)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(forwarded) = check_header("x-forwarded-for")
        && let Some(ip) = forwarded
            .split(',')
            .next()
            .and_then(|first| first.trim().parse().ok())
    {
        return Some(ip);
    }

    check_header("x-real-ip").and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_limit_then_blocks() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60), false);
        let start = Instant::now();

        for i in 0..10u32 {
            let decision = limiter.check_at(ip(1), start + Duration::from_secs(u64::from(i)));
            assert!(
                matches!(decision, Decision::Allowed { remaining, .. } if remaining == 9 - i),
                "request {i}: {decision:?}"
            );
        }

        let decision = limiter.check_at(ip(1), start + Duration::from_secs(30));
        assert_eq!(decision, Decision::Limited { reset_after: Duration::from_secs(30) });
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), false);
        let now = Instant::now();
        assert!(matches!(limiter.check_at(ip(1), now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(ip(1), now), Decision::Limited { .. }));
        assert!(matches!(limiter.check_at(ip(2), now), Decision::Allowed { .. }));
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60), false);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        limiter.check_at(ip(1), start);
        assert!(matches!(
            limiter.check_at(ip(1), start + Duration::from_secs(59)),
            Decision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at(ip(1), start + Duration::from_secs(60)),
            Decision::Allowed { remaining: 1, reset_after: Duration::from_secs(60) }
        );
    }

    #[test]
    fn test_sweeps_expired_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1), false);
        let start = Instant::now();
        for i in 0..SWEEP_THRESHOLD {
            let addr = IpAddr::V6(std::net::Ipv6Addr::from(u128::try_from(i).unwrap()));
            limiter.check_at(addr, start);
        }
        limiter.check_at(ip(1), start + Duration::from_secs(2));
        let windows = limiter.windows.lock().unwrap();
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(1500)), 2);
        assert_eq!(ceil_secs(Duration::from_secs(3)), 3);
        assert_eq!(ceil_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_client_ip_from_connect_info() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), false);
        let mut request = Request::new(Body::empty());
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 7], 5000))));
        request
            .headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(limiter.client_ip(&request), "192.168.1.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_trusts_proxy_headers_when_enabled() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), true);
        let mut request = Request::new(Body::empty());
        request.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1")
        );
        assert_eq!(limiter.client_ip(&request), "203.0.113.9".parse::<IpAddr>().unwrap());

        let mut request = Request::new(Body::empty());
        request
            .headers_mut()
            .insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(limiter.client_ip(&request), "198.51.100.4".parse::<IpAddr>().unwrap());

        let request = Request::new(Body::empty());
        assert_eq!(limiter.client_ip(&request), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
