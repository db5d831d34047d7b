//! Loading / success / error wrapper for one asynchronous fetch.
//!
//! Every repository operation is a stream that yields [`FetchState::Loading`]
//! first and then exactly one terminal state. Consumers only keep the latest
//! value.

use std::fmt::Display;
use std::future::Future;

use futures_util::stream::{self, Stream, StreamExt};

/// Current outcome of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Request in flight.
    Loading,

    /// Request finished with a value.
    Success(T),

    /// Request failed; only a display message survives.
    Error(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Map the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchState<U> {
        match self {
            Self::Loading => FetchState::Loading,
            Self::Success(value) => FetchState::Success(f(value)),
            Self::Error(message) => FetchState::Error(message),
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for FetchState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Turn a fallible future into a `Loading`-then-terminal stream.
///
/// The future is not polled until the consumer pulls past `Loading`.
pub fn track<T, E, F>(fetch: F) -> impl Stream<Item = FetchState<T>> + Send
where
    T: Send,
    E: Display,
    F: Future<Output = Result<T, E>> + Send,
{
    stream::once(async { FetchState::Loading })
        .chain(stream::once(fetch).map(FetchState::from))
}
