/// Point in the stream of submitted GPU work.
///
/// Fences wrap sequence numbers handed out by the device's submission
/// counter. Smaller values were submitted earlier. The default fence holds the
/// `-1` sentinel which means "nothing was submitted": it is never retired, and
/// callers should treat it as nothing to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fence {
    value: i64,
}

impl Fence {
    /// Raw value of the sentinel fence.
    pub const NONE: i64 = -1;

    /// Wraps a sequence number produced by a device's submission counter.
    #[inline]
    #[must_use]
    pub const fn new(seq: i64) -> Self {
        Self { value: seq }
    }

    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self { value: Self::NONE }
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.value
    }

    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.value == Self::NONE
    }

    /// `true` when `self` finishes no later than `other`.
    ///
    /// Always `false` if either side is the sentinel.
    #[inline]
    #[must_use]
    pub const fn completes_before_or_with(&self, other: Fence) -> bool {
        !self.is_none() && !other.is_none() && self.value <= other.value
    }

    /// Returns the later of two fences, ignoring sentinels.
    #[must_use]
    pub fn latest(self, other: Fence) -> Fence {
        match (self.is_none(), other.is_none()) {
            (true, _) => other,
            (_, true) => self,
            _ if other.value > self.value => other,
            _ => self,
        }
    }
}

impl Default for Fence {
    fn default() -> Self {
        Self::none()
    }
}
