//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::{Location, PanicHookInfo};

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// Render a crash report
pub fn build_crash_report(
    thread_name: &str,
    location: Option<&Location<'_>>,
    payload: &str,
    backtrace: &Backtrace,
) -> String {
    let location = location
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "<unknown>".to_string());

    format!(
        "=== CRITICAL PANIC ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {}\n\
         Payload: {}\n\n\
         Stack Trace:\n{:?}",
        Local::now().to_rfc3339(),
        thread_name,
        location,
        payload,
        backtrace
    )
}

/// Message carried by a panic payload (`&str` or `String`)
fn payload_message<'a>(payload: &'a (dyn Any + Send)) -> &'a str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<unknown>")
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");

    let report = build_crash_report(thread_name, info.location(), payload_message(info.payload()), &backtrace);

    // stderr first: the subscriber may already be gone
    eprintln!("{}", report);
    tracing::error!("{}", report);

    let dump_filename = format!(
        "postview_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let dump_path = std::env::temp_dir().join(&dump_filename);

    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    }
}
