use serde::{Deserialize, Serialize};
use transrpc_types::BandwidthGroup;

use super::{NoArguments, RpcMethod};

/// `group-set`: creates or updates a bandwidth group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SetGroup(pub BandwidthGroup);

impl RpcMethod for SetGroup {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        "group-set"
    }
}

/// `group-get`: reads bandwidth groups, all of them unless names are given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GetGroups {
    /// Names to fetch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Vec<String>>,
}

/// Result of [`GetGroups`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroupList {
    /// The matching groups.
    #[serde(default)]
    pub group: Vec<BandwidthGroup>,
}

impl RpcMethod for GetGroups {
    type Response = GroupList;

    fn method(&self) -> &'static str {
        "group-get"
    }
}
