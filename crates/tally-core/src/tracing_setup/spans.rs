//! Span definitions for engine operations.

/// Span around a single `save_measure` call.
#[macro_export]
macro_rules! save_measure_span {
    ($component:expr, $metric:expr) => {
        tracing::debug_span!("tally.save_measure", component = %$component, metric = %$metric)
    };
}

/// Span around a write-buffer flush.
#[macro_export]
macro_rules! dump_span {
    ($pending:expr) => {
        tracing::info_span!("tally.dump", pending = $pending)
    };
}
