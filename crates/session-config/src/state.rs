//! Push bookkeeping shared by every config object.

/// Sequence number plus a dirty flag.
///
/// Mutations call [`ConfigState::mark_dirty`]. A push takes the next sequence
/// number; once the swarm confirms that number, the object is clean again
/// unless it was modified in the meantime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigState {
    seqno: i64,
    dirty: bool,
    pending: Option<i64>,
}

impl ConfigState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.pending = None;
    }

    pub fn needs_push(&self) -> bool {
        self.dirty
    }

    pub fn seqno(&self) -> i64 {
        self.seqno
    }

    /// Start a push, returning the sequence number it will carry.
    pub fn push(&mut self) -> i64 {
        if self.dirty && self.pending != Some(self.seqno) {
            self.seqno += 1;
            self.pending = Some(self.seqno);
        }
        self.seqno
    }

    /// Mark `seqno` as stored remotely. Stale confirmations are ignored.
    pub fn confirm_pushed(&mut self, seqno: i64) {
        if self.pending == Some(seqno) {
            self.pending = None;
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_push_keeps_seqno() {
        let mut state = ConfigState::new();
        assert!(!state.needs_push());
        assert_eq!(state.push(), 0);
    }

    #[test]
    fn test_push_confirm_cycle() {
        let mut state = ConfigState::new();
        state.mark_dirty();
        assert_eq!(state.push(), 1);
        // Pushing again before confirmation reuses the number.
        assert_eq!(state.push(), 1);

        state.confirm_pushed(0);
        assert!(state.needs_push());

        state.confirm_pushed(1);
        assert!(!state.needs_push());
        assert_eq!(state.seqno(), 1);
    }

    #[test]
    fn test_modified_after_confirm_needs_new_seqno() {
        let mut state = ConfigState::new();
        state.mark_dirty();
        let s = state.push();
        state.confirm_pushed(s);
        state.mark_dirty();
        assert_eq!(state.push(), 2);
    }

    #[test]
    fn test_modified_during_push_stays_dirty() {
        let mut state = ConfigState::new();
        state.mark_dirty();
        let s = state.push();
        state.mark_dirty();
        state.confirm_pushed(s);
        assert!(state.needs_push());
        assert_eq!(state.push(), s + 1);
    }
}
