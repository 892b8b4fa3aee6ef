//! Typed collector outcomes.

/// Result of one signal collector.
///
/// Collectors never raise to the pipeline; instead each call resolves
/// to one of three states so the synthesizer can tell "got real data",
/// "used a documented fallback", and "got nothing" apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal<T> {
    /// Real data from the intended source.
    Success(T),
    /// A usable fallback value, with the reason the primary path failed.
    Degraded(T, String),
    /// No usable data at all.
    Failed(String),
}

impl<T> Signal<T> {
    /// The carried value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Signal::Success(v) | Signal::Degraded(v, _) => Some(v),
            Signal::Failed(_) => None,
        }
    }

    /// Consumes the signal, yielding the carried value if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Signal::Success(v) | Signal::Degraded(v, _) => Some(v),
            Signal::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Signal::Failed(_))
    }

    /// The degradation or failure reason, if the primary path failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Signal::Success(_) => None,
            Signal::Degraded(_, reason) | Signal::Failed(reason) => Some(reason),
        }
    }
}
