use colored::Colorize;
use log::error;

/// Reports engine misuse, stamped with the virtual time it happened at.
/// Callers panic right after; the log line carries the context the panic
/// message cannot.
pub(crate) fn log_incorrect_usage(time: f64, msg: &str) {
    let tag = format!("t={:.3}", time);
    error!("[{}] {}", tag.as_str().red(), msg);
}
