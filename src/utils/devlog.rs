//! Developer-level ("level 6") logging.
//!
//! Listing calls emit one JSON bench line each through `dev6!`. Lines go to
//! the `scanpage::dev6` log target and, when a capture is active on the
//! current thread, into a thread-local buffer so tests can assert on them
//! without racing the global logger.

use std::cell::RefCell;

/// Pseudo-level for developer logs.
pub const DEV_LEVEL: u32 = 6;

pub const DEV_TARGET: &str = "scanpage::dev6";

thread_local! {
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Active capture on the current thread; capturing stops when dropped.
pub struct DevCapture {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl DevCapture {
    /// Returns and clears the captured lines.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        CAPTURE.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
    }

    /// Captured lines that parse as JSON objects with a `"bench"` key.
    #[must_use]
    pub fn bench_lines(&self) -> Vec<serde_json::Value> {
        CAPTURE.with(|c| {
            c.borrow()
                .iter()
                .flatten()
                .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
                .filter(|v| v.get("bench").is_some())
                .collect()
        })
    }
}

impl Drop for DevCapture {
    fn drop(&mut self) {
        CAPTURE.with(|c| *c.borrow_mut() = None);
    }
}

/// Starts capturing dev6 lines emitted on this thread.
#[must_use]
pub fn capture() -> DevCapture {
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
    DevCapture { _not_send: std::marker::PhantomData }
}

#[doc(hidden)]
pub fn record(line: &str) {
    CAPTURE.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(line.to_owned());
        }
    });
}

/// Emit a developer log (level 6): captured on this thread if a capture is
/// active, and routed to the global logger at TRACE under `scanpage::dev6`.
#[macro_export]
macro_rules! dev6 {
    ($($arg:tt)*) => {{
        let __line = format!($($arg)*);
        $crate::utils::devlog::record(&__line);
        log::log!(target: $crate::utils::devlog::DEV_TARGET, log::Level::Trace, "{}", __line);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_until_taken() {
        let cap = capture();
        crate::dev6!("scan {}", 1);
        crate::dev6!("{{\"bench\":\"listing\",\"op\":\"list\"}}");
        assert_eq!(cap.bench_lines().len(), 1);
        let lines = cap.take();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("scan 1"));
        assert!(cap.take().is_empty());
    }

    #[test]
    fn other_threads_are_not_captured() {
        let cap = capture();
        crate::dev6!("caller");
        let seen_by_worker = std::thread::spawn(|| {
            let inner = capture();
            crate::dev6!("worker");
            inner.take()
        })
        .join()
        .unwrap();
        assert_eq!(seen_by_worker, vec!["worker".to_string()]);
        assert_eq!(cap.take(), vec!["caller".to_string()]);
    }

    #[test]
    fn nothing_is_kept_without_capture() {
        crate::dev6!("dropped");
        let cap = capture();
        assert!(cap.take().is_empty());
    }
}
