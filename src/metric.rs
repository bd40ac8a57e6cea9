use std::fmt;

use serde::Serialize;

/// A value the platform may not be able to report.
///
/// Serialises as the bare value, or `null` when unavailable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Metric<T> {
    Present(T),
    Unavailable,
}

impl<T> Metric<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Metric::Present(_))
    }

    pub fn as_ref(&self) -> Metric<&T> {
        match self {
            Metric::Present(value) => Metric::Present(value),
            Metric::Unavailable => Metric::Unavailable,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Metric<U> {
        match self {
            Metric::Present(value) => Metric::Present(f(value)),
            Metric::Unavailable => Metric::Unavailable,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Metric<U>) -> Metric<U> {
        match self {
            Metric::Present(value) => f(value),
            Metric::Unavailable => Metric::Unavailable,
        }
    }

    pub fn present(self) -> Option<T> {
        match self {
            Metric::Present(value) => Some(value),
            Metric::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Metric<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Metric::Present(value),
            None => Metric::Unavailable,
        }
    }
}

/// Renders the value, or `N/A`.
impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Present(value) => value.fmt(f),
            Metric::Unavailable => f.pad("N/A"),
        }
    }
}
