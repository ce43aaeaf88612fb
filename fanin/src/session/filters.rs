//! Standard reply filters.
//!
//! An *ack* is a successful reply that carries no payload, e.g., the last
//! reply of a node that already sent its data.

use crate::entry::Reply;

/// Successful replies with a payload.
pub fn positive(r: &dyn Reply) -> bool {
    r.status() == 0 && !r.is_empty()
}

/// Successful replies, including acks.
pub fn positive_with_ack(r: &dyn Reply) -> bool {
    r.status() == 0
}

/// Successful terminal replies.
pub fn positive_final(r: &dyn Reply) -> bool {
    r.status() == 0 && r.is_final()
}

/// Failed replies.
pub fn negative(r: &dyn Reply) -> bool {
    r.status() != 0
}

/// Every reply except acks.
pub fn all(r: &dyn Reply) -> bool {
    !r.is_ack()
}

pub fn all_with_ack(_r: &dyn Reply) -> bool {
    true
}

/// Terminal replies only.
pub fn all_final(r: &dyn Reply) -> bool {
    r.is_final()
}
