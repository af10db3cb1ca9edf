use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Bounds the number of concurrently active jobs.
///
/// Clones share the same counter, so one gate can be handed to many request
/// handlers. Admission uses compare-and-swap: the bound is never exceeded
/// under concurrent admits, and the counter never goes negative.
#[derive(Clone, Debug)]
pub struct AdmissionGate {
    active: Arc<AtomicUsize>,
    max_concurrent: usize,
}

impl AdmissionGate {
    /// Default bound on concurrent jobs.
    pub const DEFAULT_MAX_CONCURRENT: usize = 2;

    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            active: Arc::new(AtomicUsize::new(0)),
            max_concurrent,
        }
    }

    /// Try to claim a slot.
    ///
    /// Returns `None` immediately when all slots are taken.
    #[must_use]
    pub fn try_admit(&self) -> Option<AdmissionPermit> {
        let mut current = self.active.load(Ordering::Acquire);
        loop {
            if current >= self.max_concurrent {
                tracing::debug!(
                    active = current,
                    max = self.max_concurrent,
                    "admission rejected"
                );
                return None;
            }
            match self.active.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Some(AdmissionPermit {
                        active: Arc::clone(&self.active),
                    });
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Number of currently admitted jobs.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Configured bound.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CONCURRENT)
    }
}

/// RAII claim on one admission slot.
///
/// Dropping the permit releases the slot exactly once; permits cannot be
/// cloned, so double release is unrepresentable.
#[derive(Debug)]
pub struct AdmissionPermit {
    active: Arc<AtomicUsize>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        let prev = self.active.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "admission counter underflow");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;
    use tokio::sync::Barrier;

    use super::*;

    #[test]
    fn grants_up_to_max_then_rejects() {
        let gate = AdmissionGate::new(2);

        let first = gate.try_admit();
        let second = gate.try_admit();
        let third = gate.try_admit();

        assert!(first.is_some());
        assert!(second.is_some());
        assert!(third.is_none());
        assert_eq!(gate.active(), 2);
    }

    #[test]
    fn dropping_a_permit_frees_a_slot() {
        let gate = AdmissionGate::new(1);

        let permit = gate.try_admit().expect("first admit");
        assert!(gate.try_admit().is_none());

        drop(permit);
        assert_eq!(gate.active(), 0);
        assert!(gate.try_admit().is_some());
    }

    #[test]
    fn counter_returns_to_zero_after_any_sequence() {
        let gate = AdmissionGate::new(3);

        for _ in 0..5 {
            let a = gate.try_admit();
            let b = gate.try_admit();
            drop(a);
            let c = gate.try_admit();
            drop(c);
            drop(b);
        }

        assert_eq!(gate.active(), 0);
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let gate = AdmissionGate::new(0);
        assert!(gate.try_admit().is_none());
        assert_eq!(gate.active(), 0);
    }

    #[rstest]
    #[case::two_slots(2, 8)]
    #[case::one_slot(1, 8)]
    #[case::more_slots_than_tasks(8, 4)]
    #[timeout(Duration::from_secs(5))]
    #[tokio::test]
    async fn concurrent_admits_never_exceed_max(#[case] max: usize, #[case] tasks: usize) {
        let gate = AdmissionGate::new(max);
        let start = Arc::new(Barrier::new(tasks));
        let hold = Arc::new(Barrier::new(tasks));

        let mut handles = Vec::new();
        for _ in 0..tasks {
            let gate = gate.clone();
            let start = Arc::clone(&start);
            let hold = Arc::clone(&hold);
            handles.push(tokio::spawn(async move {
                start.wait().await;
                let permit = gate.try_admit();
                let granted = permit.is_some();
                // Hold every granted permit until all tasks have attempted.
                hold.wait().await;
                drop(permit);
                granted
            }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                granted += 1;
            }
        }

        assert_eq!(granted, max.min(tasks));
        assert_eq!(gate.active(), 0);
    }
}
