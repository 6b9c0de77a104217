//! Entprellung der Trigger-Flanke

/// Mindestabstand zwischen zwei akzeptierten Flanken
pub const DEBOUNCE_WINDOW_MS: u64 = 200;

/// Zeit-Gate für Flanken
///
/// Die erste Flanke wird immer akzeptiert. Danach nur Flanken, die
/// strikt mehr als das Fenster nach der letzten *akzeptierten* Flanke liegen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW_MS)
    }
}

impl Debouncer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_accepted_ms: None,
        }
    }

    pub fn accept(&mut self, now_ms: u64) -> bool {
        let accepted = match self.last_accepted_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.window_ms,
        };

        if accepted {
            self.last_accepted_ms = Some(now_ms);
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_edge_is_accepted() {
        let mut debouncer = Debouncer::default();
        assert!(debouncer.accept(0));
    }

    #[test]
    fn test_window_is_exclusive() {
        let mut debouncer = Debouncer::default();
        assert!(debouncer.accept(1_000));
        assert!(!debouncer.accept(1_200));
        assert!(debouncer.accept(1_201));
    }

    #[test]
    fn test_rejected_edges_do_not_extend_window() {
        let mut debouncer = Debouncer::default();
        assert!(debouncer.accept(0));
        assert!(!debouncer.accept(150));
        assert!(!debouncer.accept(199));
        assert!(debouncer.accept(201));
    }
}
