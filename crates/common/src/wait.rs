//! Polling waits for conditions that settle asynchronously in the browser

use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{Error, Result};

/// How long and how often to poll a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub delay: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            delay: Duration::from_millis(500),
        }
    }
}

/// Poll `condition` until it returns `Ok(true)` or the timeout elapses.
///
/// Errors raised by the condition count as "not yet"; the last one is
/// reported in the timeout message.
pub fn wait_for<F>(what: &str, options: WaitOptions, mut condition: F) -> Result<()>
where
    F: FnMut() -> Result<bool>,
{
    let start = Instant::now();
    let mut attempts = 0usize;
    let mut last_error: Option<String> = None;

    loop {
        attempts += 1;
        match condition() {
            Ok(true) => {
                debug!("{} satisfied after {} attempt(s)", what, attempts);
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => last_error = Some(e.to_string()),
        }

        if start.elapsed() >= options.timeout {
            let detail = match last_error {
                Some(e) => format!("{what} after {attempts} attempt(s), last error: {e}"),
                None => format!("{what} after {attempts} attempt(s)"),
            };
            return Err(Error::Timeout(detail));
        }

        std::thread::sleep(options.delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(50),
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_wait_for_eventually_true() {
        let mut calls = 0;
        wait_for("counter", quick(), || {
            calls += 1;
            Ok(calls >= 3)
        })
        .unwrap();
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_wait_for_times_out_with_last_error() {
        let err = wait_for("view", quick(), || Err(Error::NoSuchElement("#menu".into())))
            .unwrap_err();
        match err {
            Error::Timeout(msg) => assert!(msg.contains("#menu"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
