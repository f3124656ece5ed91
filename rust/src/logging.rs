//! Stderr tracing of graph construction and the two scheduling passes.
//!
//! Every call site passes the `GraphConfig::verbosity` it runs under; a
//! message is printed when that verbosity reaches the macro's threshold.
//!
//! | verbosity | what is printed |
//! |---|---|
//! | 0 | nothing |
//! | 1 | graph size, level count, precision; project end; critical task count |
//! | 2 | level of each task, each earliest date, each latest date with margins |
//! | 3 | sinks attached to the end task, the closure matrix |

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_TASKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Print to stderr when `$verbosity >= $threshold`.
#[doc(hidden)]
#[macro_export]
macro_rules! log_at {
    ($threshold:expr, $verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $threshold {
            eprintln!($($arg)*);
        }
    };
}

/// One line per built graph or finished pass.
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_SUMMARY, $verbosity, $($arg)*)
    };
}

/// One line per task: its level, or a date computed for it.
#[macro_export]
macro_rules! log_tasks {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_TASKS, $verbosity, $($arg)*)
    };
}

/// Matrices and intermediate construction state.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_DEBUG, $verbosity, $($arg)*)
    };
}
