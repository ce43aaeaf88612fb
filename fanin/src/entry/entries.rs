use std::fmt;

use bytes::Bytes;

use crate::entry::CmdStatus;
use crate::entry::Reply;

/// A reply with a raw payload, e.g., a remove or an exec reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackEntry {
    pub cmd: CmdStatus,
    pub data: Bytes,
}

impl CallbackEntry {
    pub fn new(cmd: CmdStatus, data: impl Into<Bytes>) -> Self {
        Self {
            cmd,
            data: data.into(),
        }
    }

    /// A reply with no payload.
    pub fn ack(cmd: CmdStatus) -> Self {
        Self {
            cmd,
            data: Bytes::new(),
        }
    }
}

impl Reply for CallbackEntry {
    fn command(&self) -> &CmdStatus {
        &self.cmd
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A reply to a read: one chunk of the record stored under `key`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadEntry {
    pub cmd: CmdStatus,
    pub key: String,
    pub data: Bytes,
}

impl ReadEntry {
    pub fn new(
        cmd: CmdStatus,
        key: impl ToString,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            cmd,
            key: key.to_string(),
            data: data.into(),
        }
    }
}

impl Reply for ReadEntry {
    fn command(&self) -> &CmdStatus {
        &self.cmd
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for ReadEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}({} bytes)", self.cmd, self.key, self.data.len())
    }
}

/// Where and how large a record is on one replica group.
///
/// Writes reply with a lookup entry of the record just written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupEntry {
    pub cmd: CmdStatus,
    pub key: String,
    pub size: u64,

    /// Address of the node that holds the record. Empty if the lookup failed.
    pub address: String,
}

impl LookupEntry {
    pub fn new(
        cmd: CmdStatus,
        key: impl ToString,
        size: u64,
        address: impl ToString,
    ) -> Self {
        Self {
            cmd,
            key: key.to_string(),
            size,
            address: address.to_string(),
        }
    }

    pub fn failed(cmd: CmdStatus, key: impl ToString) -> Self {
        Self {
            cmd,
            key: key.to_string(),
            ..Default::default()
        }
    }
}

impl Reply for LookupEntry {
    fn command(&self) -> &CmdStatus {
        &self.cmd
    }

    fn is_empty(&self) -> bool {
        self.address.is_empty()
    }
}

impl fmt::Display for LookupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} size:{} at:{}",
            self.cmd, self.key, self.size, self.address
        )
    }
}
