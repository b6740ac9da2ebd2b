use crate::cache::CachePolicy;

/// Outcome of one upstream call.
///
/// The gateway converts every failure mode (transport, non-2xx, bad JSON)
/// into `Failure` — nothing upstream-shaped ever propagates past it as an
/// error. `Success` carries `Option<T>` because some endpoints answer 200
/// with a null/absent record; callers must treat that exactly like
/// `Failure` when deciding on a 404.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success { data: Option<T> },
    /// `status` echoes the upstream HTTP status when one was received;
    /// `None` means the transport itself failed.
    Failure { error: String, status: Option<u16> },
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        ApiResult::Success { data: Some(data) }
    }

    pub fn empty() -> Self {
        ApiResult::Success { data: None }
    }

    pub fn failure(error: impl Into<String>, status: Option<u16>) -> Self {
        ApiResult::Failure {
            error: error.into(),
            status,
        }
    }

    /// Collapses the "success but nothing there" and "failure" cases into
    /// `None`; handlers use this for the 404-vs-200 decision.
    pub fn into_data(self) -> Option<T> {
        match self {
            ApiResult::Success { data } => data,
            ApiResult::Failure { .. } => None,
        }
    }
}

/// An upstream payload together with the cache policy the gateway declared
/// for the call that produced it. The policy travels with the data so route
/// handlers can stamp it onto the response without knowing which endpoint
/// family it came from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub result: ApiResult<T>,
    pub cache: CachePolicy,
}

impl<T> Fetched<T> {
    pub fn new(result: ApiResult<T>, cache: CachePolicy) -> Self {
        Self { result, cache }
    }
}
