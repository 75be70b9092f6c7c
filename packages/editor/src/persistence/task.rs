use tokio::time::Instant;

/// Single-slot cancellable scheduled work
///
/// Scheduling replaces whatever was pending. The owner polls [`deadline`] and
/// takes the payload once it is due; the slot never runs anything itself, so
/// work already taken out is unaffected by later reschedules or cancels.
///
/// [`deadline`]: DelayedTask::deadline
#[derive(Debug)]
pub struct DelayedTask<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for DelayedTask<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> DelayedTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` for `deadline`, returning the payload it replaced
    pub fn schedule(&mut self, deadline: Instant, payload: T) -> Option<T> {
        self.pending.replace((deadline, payload)).map(|(_, replaced)| replaced)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the payload if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((deadline, _)) if deadline <= now => self.cancel(),
            _ => None,
        }
    }

    /// Take the payload regardless of its deadline
    pub fn take(&mut self) -> Option<T> {
        self.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_reschedule_replaces() {
        let now = Instant::now();
        let mut task = DelayedTask::new();
        assert_eq!(task.schedule(now + Duration::from_secs(2), "a"), None);
        assert_eq!(task.schedule(now + Duration::from_secs(3), "b"), Some("a"));
        assert_eq!(task.deadline(), Some(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_take_due() {
        let now = Instant::now();
        let mut task = DelayedTask::new();
        task.schedule(now + Duration::from_millis(10), 1);

        assert_eq!(task.take_due(now), None);
        assert!(task.is_pending());
        assert_eq!(task.take_due(now + Duration::from_millis(10)), Some(1));
        assert!(!task.is_pending());
    }

    #[test]
    fn test_cancel_drops() {
        let mut task = DelayedTask::new();
        task.schedule(Instant::now(), ());
        assert_eq!(task.cancel(), Some(()));
        assert_eq!(task.take(), None);
    }
}
