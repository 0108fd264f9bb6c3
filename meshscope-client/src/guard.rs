use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ClientError;

/// At-most-one-in-flight flag for a user action.
///
/// Callers own one `InFlight` per action (e.g. one per radio selector) and
/// pass it to the request; the flag is held for as long as the returned
/// ticket lives.
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Result<InFlightTicket<'_>, ClientError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightTicket { flag: &self.busy })
            .map_err(|_| ClientError::Busy)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[must_use]
#[derive(Debug)]
pub struct InFlightTicket<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected() {
        let guard = InFlight::new();

        let ticket = guard.try_begin().expect("first request");
        assert!(guard.is_busy());
        assert!(matches!(guard.try_begin(), Err(ClientError::Busy)));

        drop(ticket);
        assert!(!guard.is_busy());
        assert!(guard.try_begin().is_ok());
    }

    #[test]
    fn test_guards_are_independent() {
        let radio_a = InFlight::new();
        let radio_b = InFlight::new();

        let _a = radio_a.try_begin().expect("radio a");
        assert!(radio_b.try_begin().is_ok());
    }
}
