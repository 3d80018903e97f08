use std::fmt;
use std::time::Duration;

/// What a single GET produced. Consumed by one assertion, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    HtmlServer,
    ErrorServer,
    RateLimit,
}

impl CheckKind {
    /// Execution order of a suite run.
    pub const ALL: [CheckKind; 3] = [
        CheckKind::HtmlServer,
        CheckKind::ErrorServer,
        CheckKind::RateLimit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::HtmlServer => "test_html_server",
            CheckKind::ErrorServer => "test_error_server",
            CheckKind::RateLimit => "test_rate_limit",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            CheckKind::HtmlServer => "HTML server test passed",
            CheckKind::ErrorServer => "Error server test passed",
            CheckKind::RateLimit => "Rate limiting test passed",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of the concurrent burst fired at the content endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstPlan {
    pub requests: usize,
    pub workers: usize,
    pub limit_status: u16,
}

impl Default for BurstPlan {
    fn default() -> Self {
        Self {
            requests: 20,
            workers: 20,
            limit_status: 429,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub check: CheckKind,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub checks: Vec<CheckReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> Vec<CheckKind> {
        self.checks.iter().map(|report| report.check).collect()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.checks.iter().map(|report| report.elapsed).sum()
    }
}
