/// The command descriptor every node reply carries.
///
/// `status` is 0 on success, otherwise a negated errno reported by the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(derive_more::Display)]
#[derive(serde::Deserialize, serde::Serialize)]
#[display("group:{group} status:{status} flags:{flags:#x}")]
pub struct CmdStatus {
    /// The replica group that sent this reply.
    pub group: u32,
    pub status: i32,
    pub flags: u64,
}

impl CmdStatus {
    /// More replies for the same command follow this one.
    pub const FLAG_MORE: u64 = 1;

    pub fn new(group: u32, status: i32) -> Self {
        Self {
            group,
            status,
            flags: 0,
        }
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        self.flags |= flags;
        self
    }

    pub fn has_more(&self) -> bool {
        self.flags & Self::FLAG_MORE != 0
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}
