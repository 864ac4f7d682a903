/// Local state of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    Pending,
    InFlight,
    Succeeded,
    Failed,
}

/// Per-upload chunk bookkeeping.
///
/// `Failed` chunks become eligible again on the next pass; `Succeeded` is
/// only ever demoted by [`reconcile`](Self::reconcile) when the server's
/// bitmap disagrees.
#[derive(Debug, Clone)]
pub struct ChunkTracker {
    states: Vec<ChunkState>,
}

impl ChunkTracker {
    pub fn new(count: u32) -> Self {
        Self {
            states: vec![ChunkState::Pending; count as usize],
        }
    }

    pub fn len(&self) -> u32 {
        self.states.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, index: u32) -> Option<ChunkState> {
        self.states.get(index as usize).copied()
    }

    fn set(&mut self, index: u32, state: ChunkState) {
        if let Some(slot) = self.states.get_mut(index as usize) {
            *slot = state;
        }
    }

    pub fn mark_in_flight(&mut self, index: u32) {
        self.set(index, ChunkState::InFlight);
    }

    pub fn mark_succeeded(&mut self, index: u32) {
        self.set(index, ChunkState::Succeeded);
    }

    pub fn mark_failed(&mut self, index: u32) {
        self.set(index, ChunkState::Failed);
    }

    /// Chunks still to send: pending or previously failed, in index order.
    pub fn outstanding(&self) -> Vec<u32> {
        self.indices_where(|s| matches!(s, ChunkState::Pending | ChunkState::Failed))
    }

    pub fn in_flight(&self) -> Vec<u32> {
        self.indices_where(|s| s == ChunkState::InFlight)
    }

    pub fn succeeded(&self) -> u32 {
        self.states
            .iter()
            .filter(|s| **s == ChunkState::Succeeded)
            .count() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|s| *s == ChunkState::Succeeded)
    }

    /// Aligns local state with the server's 0/1 bitmap and returns the
    /// chunks to resubmit, in index order, never including in-flight ones.
    ///
    /// Server-confirmed chunks become `Succeeded`; missing chunks that are
    /// not in flight become `Pending`, including ones this client believed
    /// succeeded. Chunks the bitmap does not cover (short or empty bitmap)
    /// keep their local state and are resubmitted if pending or failed.
    /// Bitmap entries beyond the plan are ignored.
    pub fn reconcile(&mut self, bitmap: &[u8]) -> Vec<u32> {
        let mut resubmit = Vec::new();
        for (i, state) in self.states.iter_mut().enumerate() {
            if *state == ChunkState::InFlight {
                continue;
            }
            match bitmap.get(i) {
                Some(0) => {
                    *state = ChunkState::Pending;
                    resubmit.push(i as u32);
                }
                Some(_) => *state = ChunkState::Succeeded,
                None => {
                    if matches!(state, ChunkState::Pending | ChunkState::Failed) {
                        resubmit.push(i as u32);
                    }
                }
            }
        }
        resubmit
    }

    fn indices_where(&self, pred: impl Fn(ChunkState) -> bool) -> Vec<u32> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| pred(**s))
            .map(|(i, _)| i as u32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_pending() {
        let t = ChunkTracker::new(3);
        assert_eq!(t.outstanding(), vec![0, 1, 2]);
        assert_eq!(t.succeeded(), 0);
        assert!(!t.is_complete());
    }

    #[test]
    fn failed_chunks_are_outstanding_again() {
        let mut t = ChunkTracker::new(3);
        t.mark_succeeded(0);
        t.mark_failed(1);
        t.mark_in_flight(2);
        assert_eq!(t.outstanding(), vec![1]);
        assert_eq!(t.in_flight(), vec![2]);
    }

    #[test]
    fn reconcile_demotes_chunk_server_never_stored() {
        let mut t = ChunkTracker::new(3);
        for i in 0..3 {
            t.mark_succeeded(i);
        }
        let resubmit = t.reconcile(&[1, 0, 1]);
        assert_eq!(resubmit, vec![1]);
        assert_eq!(t.state(1), Some(ChunkState::Pending));
        assert_eq!(t.succeeded(), 2);
    }

    #[test]
    fn reconcile_skips_in_flight_chunks() {
        let mut t = ChunkTracker::new(4);
        t.mark_in_flight(2);
        let resubmit = t.reconcile(&[0, 1, 0, 0]);
        assert_eq!(resubmit, vec![0, 3]);
        assert_eq!(t.state(2), Some(ChunkState::InFlight));
        assert_eq!(t.state(1), Some(ChunkState::Succeeded));
    }

    #[test]
    fn reconcile_ignores_bitmap_overflow() {
        let mut t = ChunkTracker::new(2);
        let resubmit = t.reconcile(&[1, 1, 0, 0]);
        assert!(resubmit.is_empty());
        assert!(t.is_complete());
    }

    #[test]
    fn reconcile_keeps_local_outstanding_beyond_bitmap() {
        let mut t = ChunkTracker::new(4);
        t.mark_succeeded(0);
        t.mark_failed(1);
        t.mark_in_flight(3);
        assert_eq!(t.reconcile(&[]), vec![1, 2]);
        assert_eq!(t.state(0), Some(ChunkState::Succeeded));

        let mut t = ChunkTracker::new(3);
        t.mark_succeeded(0);
        t.mark_succeeded(1);
        t.mark_failed(2);
        assert_eq!(t.reconcile(&[1, 0]), vec![1, 2]);
    }

    #[test]
    fn out_of_range_marks_are_ignored() {
        let mut t = ChunkTracker::new(1);
        t.mark_succeeded(7);
        assert_eq!(t.state(7), None);
        assert_eq!(t.succeeded(), 0);
    }

    #[test]
    fn empty_plan_is_complete() {
        let t = ChunkTracker::new(0);
        assert!(t.is_empty());
        assert!(t.is_complete());
    }
}
