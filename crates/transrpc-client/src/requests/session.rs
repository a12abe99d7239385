use serde::{Deserialize, Serialize};
use transrpc_types::{ByteCount, IpProtocol, SessionRecord, SessionStats};

use super::{NoArguments, RpcMethod};

/// `session-get`: reads session settings. An empty field list asks for all of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GetSession {
    /// Wire keys to fetch.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<&'static str>,
}

impl RpcMethod for GetSession {
    type Response = SessionRecord;

    fn method(&self) -> &'static str {
        "session-get"
    }
}

/// `session-set`: writes every present field of the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SetSession(pub SessionRecord);

impl RpcMethod for SetSession {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        "session-set"
    }
}

/// `session-stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GetSessionStats;

impl RpcMethod for GetSessionStats {
    type Response = SessionStats;
    const TAKES_ARGUMENTS: bool = false;

    fn method(&self) -> &'static str {
        "session-stats"
    }
}

/// `blocklist-update`: refetches the blocklist from its configured URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BlocklistUpdate;

/// Result of [`BlocklistUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BlocklistSize {
    /// Number of rules in the new blocklist.
    #[serde(rename = "blocklist-size")]
    pub size: u64,
}

impl RpcMethod for BlocklistUpdate {
    type Response = BlocklistSize;
    const TAKES_ARGUMENTS: bool = false;

    fn method(&self) -> &'static str {
        "blocklist-update"
    }
}

/// `port-test`: asks the daemon whether its peer port is reachable from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PortTest {
    /// Which protocol to test; the daemon picks one when unset.
    #[serde(rename = "ip_protocol", skip_serializing_if = "Option::is_none")]
    pub ip_protocol: Option<IpProtocol>,
}

/// Result of [`PortTest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PortTestResult {
    /// Whether the port is open.
    #[serde(rename = "port-is-open")]
    pub is_open: bool,
    /// The protocol that was tested. Older daemons leave it out.
    #[serde(rename = "ip_protocol", default)]
    pub ip_protocol: Option<IpProtocol>,
}

impl RpcMethod for PortTest {
    type Response = PortTestResult;

    fn method(&self) -> &'static str {
        "port-test"
    }
}

/// `session-close`: shuts the daemon down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CloseSession;

impl RpcMethod for CloseSession {
    type Response = NoArguments;
    const TAKES_ARGUMENTS: bool = false;

    fn method(&self) -> &'static str {
        "session-close"
    }
}

/// `free-space`: free disk space in a directory on the daemon host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeSpace {
    /// Directory to query.
    pub path: String,
}

/// Result of [`FreeSpace`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FreeSpaceResult {
    /// The queried directory.
    pub path: String,
    /// Free space.
    #[serde(rename = "size-bytes")]
    pub size_bytes: ByteCount,
    /// Size of the filesystem. Older daemons leave it out.
    #[serde(rename = "total_size", default)]
    pub total_size: Option<ByteCount>,
}

impl RpcMethod for FreeSpace {
    type Response = FreeSpaceResult;

    fn method(&self) -> &'static str {
        "free-space"
    }
}
