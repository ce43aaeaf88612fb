//! When a stored operation error is returned as `Err`.

use std::fmt;
use std::ops::BitOr;
use std::ops::BitOrAssign;

/// A bitmask of the consumption surfaces that return the stored error as an
/// `Err`.
///
/// Every consuming call of a [`ResultHandle`] tests its own bit against the
/// policy of the handle. If the bit is not set the call succeeds even though
/// the operation failed, and the failure is only visible through
/// [`ResultHandle::error`].
///
/// [`ResultHandle`]: crate::ResultHandle
/// [`ResultHandle::error`]: crate::ResultHandle::error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct ExceptionsPolicy(u32);

impl ExceptionsPolicy {
    pub const NO_EXCEPTIONS: Self = Self(0);
    pub const THROW_AT_WAIT: Self = Self(1);
    pub const THROW_AT_GET: Self = Self(1 << 1);
    pub const THROW_AT_ITERATOR_END: Self = Self(1 << 2);

    pub const DEFAULT: Self = Self(
        Self::THROW_AT_WAIT.0
            | Self::THROW_AT_GET.0
            | Self::THROW_AT_ITERATOR_END.0,
    );

    const ALL: Self = Self::DEFAULT;

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Build a policy from raw bits, unknown bits are dropped.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any bit of `other` is set.
    pub const fn intersects(&self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for ExceptionsPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for ExceptionsPolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ExceptionsPolicy {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ExceptionsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no_exceptions");
        }

        let names = [
            (Self::THROW_AT_WAIT, "throw_at_wait"),
            (Self::THROW_AT_GET, "throw_at_get"),
            (Self::THROW_AT_ITERATOR_END, "throw_at_iterator_end"),
        ];

        let mut first = true;
        for (bit, name) in names {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}
