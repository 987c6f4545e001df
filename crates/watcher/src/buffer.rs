use power_core::{PowerError, Result, Sample};

/// Fixed-capacity ring of samples, overwriting the oldest entry once full.
///
/// Slots are filled lazily, so `slots.len()` doubles as the number of valid
/// entries: a cursor back at 0 on a full buffer is never mistaken for an
/// empty one.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    slots:    Vec<Sample>,
    capacity: usize,
    /// Next slot to be written.
    cursor:   usize,
}

impl SampleBuffer {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < 2 {
            return Err(PowerError::CapacityTooSmall { capacity });
        }
        Ok(Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        })
    }

    /// Write `sample` at the cursor and advance it, evicting the oldest
    /// sample once the buffer has wrapped.
    pub fn push(&mut self, sample: Sample) {
        if self.slots.len() < self.capacity {
            self.slots.push(sample);
        } else {
            self.slots[self.cursor] = sample;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of valid samples, at most `capacity`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot holding the most recent sample, `None` if nothing was ever pushed.
    pub fn latest_index(&self) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        Some((self.cursor + self.capacity - 1) % self.capacity)
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.latest_index().map(|i| &self.slots[i])
    }

    /// Walk from slot `from` towards older samples, wrapping around.
    ///
    /// Yields at most `limit` samples and never more than one lap over the
    /// valid entries. An out-of-range `from` yields nothing.
    pub fn iter_backward(&self, from: usize, limit: usize) -> impl Iterator<Item = &Sample> + '_ {
        let len = self.slots.len();
        let steps = if from < len { limit.min(len) } else { 0 };
        (0..steps).map(move |step| &self.slots[(from + len - step) % len])
    }
}
