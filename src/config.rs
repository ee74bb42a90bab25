//! Runtime tuning knobs.

/// Default intake capacity.
///
/// Messages dispatched before the loop starts consuming (while `pre_effect`
/// is still resolving) are buffered up to this depth; beyond it the
/// non-suspending dispatch reports
/// [`MailboxFull`](crate::DispatchError::MailboxFull) and the suspending
/// one waits.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 16;

/// Configuration for a feature runtime.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Capacity of the bounded message intake.
    pub mailbox_capacity: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}
