use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// The gate's channel halves are owned together; a receive error can only
/// mean the engine itself has been torn down mid-frame.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("admission gate closed while a frame was pending")]
    Closed,
}

/// Counting admission gate bounding frames in flight.
///
/// A bounded channel pre-filled with slot indices acts as a counting
/// semaphore: acquiring stalls the producer until a previously submitted
/// frame's completion callback has returned its slot. The slot index
/// doubles as the uniform-buffer index.
pub(crate) struct AdmissionGate {
    slots: Receiver<usize>,
    returns: Sender<usize>,
    capacity: usize,
}

impl AdmissionGate {
    pub(crate) fn new(capacity: usize) -> Self {
        let (returns, slots) = bounded(capacity);
        for slot in 0..capacity {
            returns
                .send(slot)
                .expect("freshly created gate accepts its own slots");
        }
        Self {
            slots,
            returns,
            capacity,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-blocking acquire.
    pub(crate) fn try_acquire(&self) -> Result<Option<usize>, GateError> {
        match self.slots.try_recv() {
            Ok(slot) => Ok(Some(slot)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(GateError::Closed),
        }
    }

    /// Waits for a slot, invoking `pump` whenever none is free.
    ///
    /// Slots come back through GPU completion callbacks, and on native wgpu
    /// those only run while the device is polled. A plain blocking wait on
    /// the channel would therefore never observe the release; the caller
    /// supplies the device poll as `pump`. This is the sole backpressure
    /// point of the frame loop; the wait is unbounded by design.
    pub(crate) fn acquire_with<E, F>(&self, mut pump: F) -> Result<usize, E>
    where
        E: From<GateError>,
        F: FnMut() -> Result<(), E>,
    {
        loop {
            if let Some(slot) = self.try_acquire().map_err(E::from)? {
                return Ok(slot);
            }
            pump()?;
        }
    }

    /// Returns a slot immediately, without going through a GPU callback.
    pub(crate) fn release(&self, slot: usize) {
        // Send can only fail once the gate is dropped, at which point the
        // slot no longer matters.
        let _ = self.returns.send(slot);
    }

    /// Produces the completion callback that hands `slot` back once the GPU
    /// has finished the frame's submission.
    pub(crate) fn releaser(&self, slot: usize) -> impl FnOnce() + Send + 'static {
        let returns = self.returns.clone();
        move || {
            let _ = returns.send(slot);
        }
    }

    /// Acquires every slot, i.e. waits until no frame is in flight, pumping
    /// outstanding completion callbacks via `pump` like [`acquire_with`].
    /// Used to quiesce the GPU before the texture ring is rebuilt on resize.
    ///
    /// [`acquire_with`]: Self::acquire_with
    pub(crate) fn drain_with<E, F>(&self, mut pump: F) -> Result<Vec<usize>, E>
    where
        E: From<GateError>,
        F: FnMut() -> Result<(), E>,
    {
        (0..self.capacity)
            .map(|_| self.acquire_with(&mut pump))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_admits_at_most_capacity_frames() {
        let gate = AdmissionGate::new(3);
        let mut held = Vec::new();
        while let Some(slot) = gate.try_acquire().expect("gate open") {
            held.push(slot);
        }
        assert_eq!(held.len(), 3);
        assert!(gate.try_acquire().expect("gate open").is_none());
    }

    fn no_pump() -> Result<(), GateError> {
        panic!("all slots should be free, no pump expected");
    }

    #[test]
    fn release_balances_acquire() {
        let gate = AdmissionGate::new(3);
        let first = gate.try_acquire().expect("gate open").expect("slot");
        let second = gate.try_acquire().expect("gate open").expect("slot");
        gate.release(first);
        gate.release(second);

        let drained = gate.drain_with(no_pump).expect("drain");
        assert_eq!(drained.len(), 3);
    }

    #[test]
    fn completion_callback_returns_the_slot() {
        let gate = AdmissionGate::new(2);
        let slot = gate.try_acquire().expect("gate open").expect("slot");
        let _other = gate.try_acquire().expect("gate open").expect("slot");
        assert!(gate.try_acquire().expect("gate open").is_none());

        let release = gate.releaser(slot);
        release();

        assert_eq!(gate.try_acquire().expect("gate open"), Some(slot));
    }

    #[test]
    fn drain_pumps_outstanding_completion_callbacks() {
        let gate = AdmissionGate::new(3);
        let slot = gate.try_acquire().expect("gate open").expect("slot");

        // Stands in for a completion callback that is queued on the device
        // and only runs once the device gets polled.
        let mut pending = Some(gate.releaser(slot));
        let drained = gate
            .drain_with(|| -> Result<(), GateError> {
                if let Some(release) = pending.take() {
                    release();
                }
                Ok(())
            })
            .expect("drain");
        assert_eq!(drained.len(), 3);
    }

    #[test]
    fn acquire_pumps_until_a_slot_frees_up() {
        let gate = AdmissionGate::new(1);
        let slot = gate.try_acquire().expect("gate open").expect("slot");

        let mut pending = Some(gate.releaser(slot));
        let mut pumps = 0u32;
        let reacquired = gate
            .acquire_with(|| -> Result<(), GateError> {
                pumps += 1;
                if let Some(release) = pending.take() {
                    release();
                }
                Ok(())
            })
            .expect("slot");
        assert_eq!(reacquired, slot);
        assert_eq!(pumps, 1, "the wait must make progress via the pump alone");
    }

    #[test]
    fn slots_double_as_stable_indices() {
        let gate = AdmissionGate::new(3);
        let mut seen = gate.drain_with(no_pump).expect("drain");
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
