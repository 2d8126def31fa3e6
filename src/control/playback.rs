//! Fixed-grid playback scheduling

use std::collections::VecDeque;
use std::time::Duration;

use super::ToneEvent;

/// A tone due at `offset` from playback start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub index: usize,
    pub offset: Duration,
    pub event: ToneEvent,
}

/// Pending playback tones, released strictly in log order
///
/// Tone `k` is due at `k * interval`. Dropping or cancelling the schedule
/// retracts everything that has not fired yet.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSchedule {
    pending: VecDeque<ScheduledTone>,
    total: usize,
}

impl PlaybackSchedule {
    /// Lay `events` out on a grid of `interval`
    pub fn plan(events: &[ToneEvent], interval: Duration) -> Self {
        let pending: VecDeque<ScheduledTone> = events
            .iter()
            .enumerate()
            .map(|(index, &event)| ScheduledTone {
                index,
                offset: interval * index as u32,
                event,
            })
            .collect();
        let total = pending.len();
        Self { pending, total }
    }

    /// Offset of the next tone, if any remain
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.front().map(|tone| tone.offset)
    }

    /// Remove and return every tone due by `elapsed`, in index order
    pub fn take_due(&mut self, elapsed: Duration) -> Vec<ScheduledTone> {
        let mut due = Vec::new();
        while let Some(tone) = self.pending.front() {
            if tone.offset > elapsed {
                break;
            }
            if let Some(tone) = self.pending.pop_front() {
                due.push(tone);
            }
        }
        due
    }

    /// Drop all pending tones, returning how many were retracted
    pub fn cancel(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<ToneEvent> {
        vec![
            ToneEvent::new(100.0, 0.2, 0.1),
            ToneEvent::new(200.0, 0.4, 0.2),
            ToneEvent::new(300.0, 0.6, 0.3),
        ]
    }

    #[test]
    fn test_plan_offsets() {
        let schedule = PlaybackSchedule::plan(&events(), Duration::from_millis(500));
        let offsets: Vec<Duration> = schedule.pending.iter().map(|t| t.offset).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                Duration::from_millis(500),
                Duration::from_millis(1000)
            ]
        );
        assert_eq!(schedule.total(), 3);
    }

    #[test]
    fn test_take_due_releases_in_order() {
        let mut schedule = PlaybackSchedule::plan(&events(), Duration::from_millis(500));

        let first = schedule.take_due(Duration::ZERO);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].index, 0);

        assert!(schedule.take_due(Duration::from_millis(499)).is_empty());
        assert_eq!(schedule.next_deadline(), Some(Duration::from_millis(500)));

        // A late poll releases everything overdue, oldest first
        let rest = schedule.take_due(Duration::from_secs(5));
        let indices: Vec<usize> = rest.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert!(schedule.is_finished());
    }

    #[test]
    fn test_shared_deadline_keeps_log_order() {
        let mut schedule = PlaybackSchedule::plan(&events(), Duration::ZERO);
        let indices: Vec<usize> = schedule
            .take_due(Duration::ZERO)
            .iter()
            .map(|t| t.index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_cancel_retracts_pending() {
        let mut schedule = PlaybackSchedule::plan(&events(), Duration::from_millis(500));
        schedule.take_due(Duration::ZERO);

        assert_eq!(schedule.cancel(), 2);
        assert!(schedule.is_finished());
        assert!(schedule.take_due(Duration::from_secs(10)).is_empty());
    }
}
