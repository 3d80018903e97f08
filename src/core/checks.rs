use crate::domain::model::BurstPlan;
use crate::domain::ports::HttpProbe;
use crate::utils::error::{CheckError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const HTML_TARGET: &str = "HTML server";
pub const ERROR_TARGET: &str = "Error server";

/// The content endpoint must answer 200 with `marker` somewhere in the body.
pub async fn test_html_server<P>(probe: &P, url: &str, marker: &str) -> Result<()>
where
    P: HttpProbe + ?Sized,
{
    let response = probe.get(url).await?;

    if response.status != 200 {
        return Err(CheckError::UnexpectedStatus {
            target: HTML_TARGET.to_string(),
            expected: 200,
            actual: response.status,
        });
    }

    if !response.body.contains(marker) {
        tracing::debug!(
            "Body from {} ({} bytes) does not contain {:?}",
            url,
            response.body.len(),
            marker
        );
        return Err(CheckError::UnexpectedBody {
            target: HTML_TARGET.to_string(),
            marker: marker.to_string(),
        });
    }

    Ok(())
}

/// The error endpoint must answer exactly 500.
pub async fn test_error_server<P>(probe: &P, url: &str) -> Result<()>
where
    P: HttpProbe + ?Sized,
{
    let response = probe.get(url).await?;

    if response.status != 500 {
        return Err(CheckError::UnexpectedStatus {
            target: ERROR_TARGET.to_string(),
            expected: 500,
            actual: response.status,
        });
    }

    Ok(())
}

/// Fires the burst and requires at least one `plan.limit_status` among the replies.
pub async fn test_rate_limit<P>(probe: Arc<P>, url: &str, plan: BurstPlan) -> Result<()>
where
    P: HttpProbe + ?Sized + 'static,
{
    let statuses = dispatch_burst(probe, url, plan).await?;
    tracing::debug!("Burst status codes: {:?}", statuses);

    if !statuses.contains(&plan.limit_status) {
        return Err(CheckError::RateLimitNotTriggered {
            limit_status: plan.limit_status,
            statuses,
        });
    }

    Ok(())
}

/// Sends `plan.requests` GETs with at most `plan.workers` in flight and returns
/// every status code in completion order. Waits for all of them before
/// returning, even when one fails; the first failure observed is returned.
pub async fn dispatch_burst<P>(probe: Arc<P>, url: &str, plan: BurstPlan) -> Result<Vec<u16>>
where
    P: HttpProbe + ?Sized + 'static,
{
    if plan.workers == 0 || plan.workers > Semaphore::MAX_PERMITS {
        return Err(CheckError::InvalidConfigValueError {
            field: "rate_limit.workers".to_string(),
            value: plan.workers.to_string(),
            reason: format!("Value must be between 1 and {}", Semaphore::MAX_PERMITS),
        });
    }

    let permits = Arc::new(Semaphore::new(plan.workers));
    let mut tasks = JoinSet::new();

    for _ in 0..plan.requests {
        let probe = Arc::clone(&probe);
        let permits = Arc::clone(&permits);
        let url = url.to_string();

        tasks.spawn(async move { send_one(probe.as_ref(), &permits, &url).await });
    }

    let mut statuses = Vec::with_capacity(plan.requests);
    let mut first_error = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(status)) => statuses.push(status),
            Ok(Err(e)) => {
                tracing::warn!("Burst request failed: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                tracing::warn!("Burst worker did not finish: {}", e);
                if first_error.is_none() {
                    first_error = Some(CheckError::WorkerFailed {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(statuses),
    }
}

async fn send_one<P>(probe: &P, permits: &Semaphore, url: &str) -> Result<u16>
where
    P: HttpProbe + ?Sized,
{
    let _permit = permits
        .acquire()
        .await
        .map_err(|e| CheckError::WorkerFailed {
            reason: e.to_string(),
        })?;
    let response = probe.get(url).await?;
    Ok(response.status)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::model::ProbeResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    type Responder = Box<dyn Fn(usize, &str) -> Result<ProbeResponse> + Send + Sync>;

    /// Answers each call from a closure over (call index, url) and counts calls.
    pub(crate) struct ScriptedProbe {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
        responder: Responder,
    }

    impl ScriptedProbe {
        pub(crate) fn new<F>(responder: F) -> Self
        where
            F: Fn(usize, &str) -> Result<ProbeResponse> + Send + Sync + 'static,
        {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                delay: Duration::ZERO,
                responder: Box::new(responder),
            }
        }

        pub(crate) fn always(status: u16, body: &'static str) -> Self {
            Self::new(move |_, _| Ok(ProbeResponse::new(status, body)))
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl HttpProbe for ScriptedProbe {
        async fn get(&self, url: &str) -> Result<ProbeResponse> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            (self.responder)(index, url)
        }
    }

    fn refused() -> CheckError {
        CheckError::IoError(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[tokio::test]
    async fn test_html_server_passes_on_200_with_marker() {
        let probe = ScriptedProbe::always(200, "<h1>Nginx is running</h1>");
        assert_ok!(test_html_server(&probe, "http://nginx:8080", "Nginx is running").await);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test]
    async fn test_html_server_rejects_non_200() {
        let probe = ScriptedProbe::always(404, "Nginx is running");
        let err = assert_err!(test_html_server(&probe, "http://nginx:8080", "Nginx is running").await);

        match err {
            CheckError::UnexpectedStatus {
                expected, actual, ..
            } => {
                assert_eq!(expected, 200);
                assert_eq!(actual, 404);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_html_server_rejects_empty_or_unrelated_body() {
        for body in ["", "Welcome to Apache"] {
            let probe = ScriptedProbe::always(200, body);
            let err = assert_err!(
                test_html_server(&probe, "http://nginx:8080", "Nginx is running").await
            );
            assert!(matches!(err, CheckError::UnexpectedBody { .. }), "body {:?}", body);
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[tokio::test]
    async fn test_html_server_propagates_transport_errors() {
        let probe = ScriptedProbe::new(|_, _| Err(refused()));
        let err = assert_err!(test_html_server(&probe, "http://nginx:8080", "x").await);
        assert!(matches!(err, CheckError::IoError(_)));
    }

    #[tokio::test]
    async fn test_error_server_requires_exactly_500() {
        let probe = ScriptedProbe::always(500, "");
        assert_ok!(test_error_server(&probe, "http://nginx:8081").await);

        for status in [200, 503] {
            let probe = ScriptedProbe::always(status, "");
            let err = assert_err!(test_error_server(&probe, "http://nginx:8081").await);
            assert_eq!(
                err.to_string(),
                format!("Error server returned {}, expected 500", status)
            );
        }
    }

    #[tokio::test]
    async fn test_rate_limit_passes_when_tail_of_burst_is_throttled() {
        // 15th through 20th request are throttled
        let probe = Arc::new(ScriptedProbe::new(|index, _| {
            let status = if index >= 14 { 429 } else { 200 };
            Ok(ProbeResponse::new(status, ""))
        }));

        assert_ok!(test_rate_limit(Arc::clone(&probe), "http://nginx:8080", BurstPlan::default()).await);
        assert_eq!(probe.calls(), 20);
    }

    #[tokio::test]
    async fn test_rate_limit_fails_when_never_throttled() {
        let probe = Arc::new(ScriptedProbe::always(200, "Nginx is running"));

        let err = assert_err!(
            test_rate_limit(Arc::clone(&probe), "http://nginx:8080", BurstPlan::default()).await
        );

        match err {
            CheckError::RateLimitNotTriggered {
                limit_status,
                statuses,
            } => {
                assert_eq!(limit_status, 429);
                assert_eq!(statuses.len(), 20);
                assert!(statuses.iter().all(|status| *status == 200));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(probe.calls(), 20);
    }

    #[tokio::test]
    async fn test_burst_does_not_stop_at_first_429() {
        let probe = Arc::new(ScriptedProbe::new(|index, _| {
            let status = if index == 0 { 429 } else { 200 };
            Ok(ProbeResponse::new(status, ""))
        }));

        let statuses = assert_ok!(
            dispatch_burst(Arc::clone(&probe), "http://nginx:8080", BurstPlan::default()).await
        );
        assert_eq!(statuses.len(), 20);
        assert_eq!(statuses.iter().filter(|status| **status == 429).count(), 1);
        assert_eq!(probe.calls(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_respects_worker_bound() {
        let probe = Arc::new(ScriptedProbe::always(200, "").with_delay(Duration::from_millis(20)));
        let plan = BurstPlan {
            requests: 12,
            workers: 3,
            limit_status: 429,
        };

        let statuses = assert_ok!(dispatch_burst(Arc::clone(&probe), "http://nginx:8080", plan).await);
        assert_eq!(statuses.len(), 12);
        assert!(probe.max_in_flight() <= 3, "max in flight {}", probe.max_in_flight());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_runs_requests_concurrently() {
        let probe = Arc::new(ScriptedProbe::always(200, "").with_delay(Duration::from_millis(50)));

        let statuses = assert_ok!(
            dispatch_burst(Arc::clone(&probe), "http://nginx:8080", BurstPlan::default()).await
        );
        assert_eq!(statuses.len(), 20);
        assert!(probe.max_in_flight() > 1);
    }

    #[tokio::test]
    async fn test_burst_with_more_workers_than_requests() {
        let probe = Arc::new(ScriptedProbe::always(429, ""));
        let plan = BurstPlan {
            requests: 3,
            workers: 20,
            limit_status: 429,
        };

        let statuses = assert_ok!(dispatch_burst(Arc::clone(&probe), "http://nginx:8080", plan).await);
        assert_eq!(statuses, vec![429; 3]);
        assert_eq!(probe.calls(), 3);
    }

    #[tokio::test]
    async fn test_burst_rejects_oversized_pool_without_sending() {
        let probe = Arc::new(ScriptedProbe::always(200, ""));
        let plan = BurstPlan {
            workers: usize::MAX,
            ..BurstPlan::default()
        };

        let err = assert_err!(dispatch_burst(Arc::clone(&probe), "http://nginx:8080", plan).await);
        assert!(matches!(err, CheckError::InvalidConfigValueError { .. }));
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn test_burst_waits_for_all_requests_before_reporting_failure() {
        let probe = Arc::new(ScriptedProbe::new(|index, _| {
            if index == 3 {
                Err(refused())
            } else {
                Ok(ProbeResponse::new(429, ""))
            }
        }));

        let err = assert_err!(
            test_rate_limit(Arc::clone(&probe), "http://nginx:8080", BurstPlan::default()).await
        );
        assert!(matches!(err, CheckError::IoError(_)));
        assert_eq!(probe.calls(), 20);
    }
}
