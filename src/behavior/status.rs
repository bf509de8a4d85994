//! Status returned by behavior nodes.

use serde::{Deserialize, Serialize};

/// The result of ticking a behavior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The behavior needs more ticks. Composites resume here next tick.
    Running,
    /// The behavior completed successfully.
    ///
    /// For conditions: the predicate held.
    Success,
    /// The behavior failed.
    ///
    /// For conditions: the predicate did not hold.
    Failure,
}

impl Status {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_done(self) -> bool {
        !self.is_running()
    }

    /// Success for `true`, Failure for `false`.
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
