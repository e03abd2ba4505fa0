//! Request generations for last-issued-wins completion.

/// Tag handed out when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Numeric value, for log fields.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues generations and tells whether a completing request is still the
/// latest one.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    /// Create a counter with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new generation, superseding every earlier one.
    pub fn issue(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    /// Supersede all issued generations without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    /// Whether `generation` is the most recently issued one.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}
