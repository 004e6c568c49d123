//! Midpoint bisection shared by the tuning voltage and bandwidth searches
//!
//! The interval `[low, high]` always satisfies `low < high`; the search
//! ends once the two bounds are adjacent (`high - low == 1`).

/// Bisection state over an integer interval
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinarySearch {
    low: u16,
    high: u16,
    mid: Option<u16>,
    steps: u8,
}

impl BinarySearch {
    /// Search `[low, high]`
    #[must_use]
    pub const fn new(low: u16, high: u16) -> Self {
        Self {
            low,
            high,
            mid: None,
            steps: 0,
        }
    }

    /// Next midpoint to try, or `None` once the interval is minimal
    pub fn next_mid(&mut self) -> Option<u16> {
        if u32::from(self.low) + 1 < u32::from(self.high) {
            let mid = u16::try_from((u32::from(self.low) + u32::from(self.high)) / 2).unwrap_or(self.low);
            self.mid = Some(mid);
            self.steps = self.steps.saturating_add(1);
            Some(mid)
        } else {
            None
        }
    }

    /// The last midpoint was at or above the target
    pub fn narrow_upper(&mut self) {
        if let Some(mid) = self.mid {
            self.high = mid;
        }
    }

    /// The last midpoint was below the target
    pub fn narrow_lower(&mut self) {
        if let Some(mid) = self.mid {
            self.low = mid;
        }
    }

    /// Final midpoint (the lower bound if no step was taken)
    #[must_use]
    pub fn result(&self) -> u16 {
        self.mid.unwrap_or(self.low)
    }

    /// Current bounds
    #[must_use]
    pub const fn bounds(&self) -> (u16, u16) {
        (self.low, self.high)
    }

    /// Midpoints tried so far
    #[must_use]
    pub const fn steps(&self) -> u8 {
        self.steps
    }
}
