//! Dispatch result and transport selection.

use std::fmt;

/// Result of running one event through the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A route matched and its handler ran to completion.
    Handled { route: &'static str },
    /// No route matched; the event is silently dropped.
    Unhandled,
    /// A middleware chose not to call downstream.
    Suppressed { by: &'static str },
}

/// How events reach the process. Only one transport may be active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// The platform pushes events to an HTTP endpoint exposed by this process.
    Webhook,
    /// This process repeatedly pulls batches of events.
    Polling,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Webhook => write!(f, "webhook"),
            TransportMode::Polling => write!(f, "polling"),
        }
    }
}
