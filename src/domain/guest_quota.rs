//! Guest link quota.
//!
//! Guests may create a small number of links before they have to sign in. The
//! counter travels in a client-side cookie, so it is a courtesy limit rather
//! than an enforcement boundary: a client that discards or edits the cookie
//! resets its own quota. Reset happens when the cookie expires.

/// Default number of links a guest may create.
pub const DEFAULT_GUEST_LINK_LIMIT: u32 = 3;

/// Snapshot of a guest's quota usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestQuota {
    used: u32,
    limit: u32,
}

impl GuestQuota {
    pub fn new(used: u32, limit: u32) -> Self {
        Self { used, limit }
    }

    /// Builds a quota from the raw cookie counter.
    ///
    /// A missing or unparsable counter counts as zero links used.
    pub fn from_counter(raw: Option<&str>, limit: u32) -> Self {
        let used = raw.and_then(|v| v.trim().parse::<u32>().ok()).unwrap_or(0);
        Self::new(used, limit)
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Links the guest may still create.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Returns the quota after one more link, or `None` if the limit is reached.
    ///
    /// The returned counter never exceeds the limit.
    pub fn consume(self) -> Option<Self> {
        if self.is_exhausted() {
            return None;
        }

        Some(Self {
            used: self.used + 1,
            limit: self.limit,
        })
    }
}
