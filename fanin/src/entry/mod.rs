//! Node replies collected by a [`ResultHandle`].
//!
//! [`ResultHandle`]: crate::ResultHandle

mod cmd_status;
mod entries;


pub use cmd_status::CmdStatus;
pub use entries::CallbackEntry;
pub use entries::LookupEntry;
pub use entries::ReadEntry;

/// A reply sent by one node for a fanned-out command.
///
/// A reply without [`CmdStatus::FLAG_MORE`] is *terminal*: it is the last
/// reply of a node for the command and its status is counted by the checker.
///
/// This trait is object safe so that filters can be shared by results of any
/// reply type.
pub trait Reply {
    fn command(&self) -> &CmdStatus;

    /// Whether this reply carries no payload.
    fn is_empty(&self) -> bool;

    fn status(&self) -> i32 {
        self.command().status
    }

    fn has_more(&self) -> bool {
        self.command().has_more()
    }

    fn is_final(&self) -> bool {
        !self.has_more()
    }

    /// A successful reply that carries nothing but the acknowledgement.
    fn is_ack(&self) -> bool {
        self.status() == 0 && self.is_empty()
    }
}
