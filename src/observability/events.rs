//! Observable events
//!
//! Every structured log line carries one of these in its `event` field, so
//! logs can be filtered by event name regardless of the message text.

use std::fmt;

/// Observable events in recordgate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// HTTP listener bound
    Serving,

    // Query processing
    /// List request accepted for an entity
    QueryReceived,
    /// Ownership predicate injected
    ScopeApplied,
    /// Privileged caller or shared entity, no ownership predicate
    ScopeBypassed,
    /// Filters compiled and pagination planned
    QueryPlanned,
    /// Page returned
    QueryExecuted,
    /// Client error, nothing executed
    QueryRejected,
    /// Store call aborted by cancellation or timeout
    QueryCanceled,

    // Faults
    /// Deployment bug: unknown entity, bad access rule, failing store
    ConfigurationFault,
}

impl Event {
    /// Returns the event name as it appears in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "SERVING",
            Event::QueryReceived => "QUERY_RECEIVED",
            Event::ScopeApplied => "SCOPE_APPLIED",
            Event::ScopeBypassed => "SCOPE_BYPASSED",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryCanceled => "QUERY_CANCELED",
            Event::ConfigurationFault => "CONFIGURATION_FAULT",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::QueryRejected.to_string(), "QUERY_REJECTED");
        assert_eq!(Event::ConfigurationFault.as_str(), "CONFIGURATION_FAULT");
    }
}
