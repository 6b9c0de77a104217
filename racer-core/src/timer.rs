//! One-Shot Deadline
//!
//! Ersetzt Timer-Callbacks: der Task, dem der Zustand gehört, besitzt auch
//! die Deadline und fragt sie mit der aktuellen Zeit ab. Erneutes Armieren
//! ersetzt die alte Deadline (letzter Trigger gewinnt).

/// Einmaliger Timer auf Millisekunden-Basis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OneShot {
    deadline: Option<u64>,
}

impl OneShot {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Armiert den Timer auf `now + period_ms` (ersetzt eine laufende Deadline)
    pub fn arm(&mut self, now_ms: u64, period_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(period_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// `true` genau einmal, sobald `now_ms` die Deadline erreicht
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
