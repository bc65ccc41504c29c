//! Observable query state

use serde::{Deserialize, Serialize};

use crate::Error;

/// Lifecycle status of a query
///
/// `Idle` means no fetch was ever requested (or the query is disabled),
/// which is distinct from a settled `Success` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
        }
    }

    /// Success or Error
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchStatus::Success | FetchStatus::Error)
    }
}

/// What the presentation layer renders for one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<V> {
    /// Latest value, or the previous key's value when `is_placeholder`
    pub data: Option<V>,
    pub status: FetchStatus,
    pub error: Option<Error>,
    /// `data` belongs to an earlier key of the same query family
    pub is_placeholder: bool,
    /// `data` is past its staleness window and is being refreshed
    pub is_stale: bool,
}

impl<V> QueryState<V> {
    /// Disabled or never requested
    pub fn idle() -> Self {
        Self {
            data: None,
            status: FetchStatus::Idle,
            error: None,
            is_placeholder: false,
            is_stale: false,
        }
    }

    /// In flight, optionally showing a placeholder from the same family
    pub fn loading(placeholder: Option<V>) -> Self {
        Self {
            is_placeholder: placeholder.is_some(),
            data: placeholder,
            status: FetchStatus::Loading,
            error: None,
            is_stale: false,
        }
    }

    pub fn success(value: V) -> Self {
        Self {
            data: Some(value),
            status: FetchStatus::Success,
            error: None,
            is_placeholder: false,
            is_stale: false,
        }
    }

    /// Served from cache past its staleness window
    pub fn stale(value: V) -> Self {
        Self {
            is_stale: true,
            ..Self::success(value)
        }
    }

    pub fn failed(error: Error) -> Self {
        Self {
            data: None,
            status: FetchStatus::Error,
            error: Some(error),
            is_placeholder: false,
            is_stale: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == FetchStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == FetchStatus::Error
    }

    /// Settled with a not-found error, rendered differently from a generic failure
    pub fn is_not_found(&self) -> bool {
        self.error.as_ref().is_some_and(Error::is_not_found)
    }

    /// Extract the value, consuming the state
    pub fn value(self) -> Option<V> {
        self.data
    }

    /// Borrow the value
    pub fn data(&self) -> Option<&V> {
        self.data.as_ref()
    }

    /// Collapse into a `Result`, treating idle and loading as `Ok(None)`
    pub fn into_result(self) -> crate::Result<Option<V>> {
        match self.error {
            Some(err) if self.status == FetchStatus::Error => Err(err),
            _ => Ok(self.data),
        }
    }

    /// Map the value if present
    pub fn map<U, F>(self, f: F) -> QueryState<U>
    where
        F: FnOnce(V) -> U,
    {
        QueryState {
            data: self.data.map(f),
            status: self.status,
            error: self.error,
            is_placeholder: self.is_placeholder,
            is_stale: self.is_stale,
        }
    }
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle() {
        let state: QueryState<i32> = QueryState::idle();
        assert!(state.is_idle());
        assert!(!state.status.is_settled());
        assert!(state.value().is_none());
    }

    #[test]
    fn test_loading_with_placeholder() {
        let state = QueryState::loading(Some(7));
        assert!(state.is_loading());
        assert!(state.is_placeholder);
        assert_eq!(state.data(), Some(&7));

        let state: QueryState<i32> = QueryState::loading(None);
        assert!(!state.is_placeholder);
    }

    #[test]
    fn test_not_found_is_distinct() {
        let missing: QueryState<i32> = QueryState::failed(Error::NotFound("9".into()));
        let broken: QueryState<i32> = QueryState::failed(Error::remote_status(500, "boom"));

        assert!(missing.is_error() && missing.is_not_found());
        assert!(broken.is_error() && !broken.is_not_found());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(QueryState::success(3).into_result(), Ok(Some(3)));
        assert_eq!(QueryState::<i32>::idle().into_result(), Ok(None));
        assert!(QueryState::<i32>::failed(Error::Internal("x".into()))
            .into_result()
            .is_err());
    }

    #[test]
    fn test_map_keeps_flags() {
        let mapped = QueryState::stale(21).map(|v| v * 2);
        assert_eq!(mapped.data, Some(42));
        assert!(mapped.is_stale);
        assert!(mapped.is_success());
    }
}
