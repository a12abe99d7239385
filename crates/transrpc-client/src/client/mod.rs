//! Transmission RPC client implementation.

use tracing::{debug, warn};
use transrpc_types::{
    BandwidthGroup, FieldId, FieldRecord, IpProtocol, RpcError, RpcResult, SessionRecord,
    SessionStats, TorrentId, TorrentRecord, TorrentSelector, wire_keys,
};
use url::Url;

use crate::config::ClientConfig;
use crate::requests::{
    AddTorrent, AddedTorrent, BlocklistUpdate, CloseSession, FreeSpace, FreeSpaceResult,
    GetGroups, GetSession, GetSessionStats, GetTorrents, PortTest, PortTestResult, QueueMove,
    QueueMoveRequest, RemoveTorrents, RenamePath, RenamedPath, RpcMethod, SetGroup, SetLocation,
    SetSession, SetTorrents, TorrentAction, TorrentActionRequest, TorrentList, TorrentMutation,
};
use crate::transport::{HttpSend, ReqwestSender, Transport};

#[cfg(test)]
mod tests;

/// A client for one Transmission daemon.
///
/// Cheap to share behind an `Arc`; concurrent calls are independent and share only the
/// session id.
#[derive(Debug)]
pub struct TransmissionClient<H: HttpSend = ReqwestSender> {
    transport: Transport<H>,
}

impl TransmissionClient {
    /// Creates a client that talks HTTP through `reqwest`.
    ///
    /// Nothing is sent until the first call; an invalid URL or unusable credentials fail here.
    pub fn try_new(config: &ClientConfig) -> RpcResult<Self> {
        let sender = ReqwestSender::new(config.timeout)?;
        Self::with_sender(config, sender)
    }
}

impl<H: HttpSend> TransmissionClient<H> {
    /// Creates a client that sends its HTTP requests through `sender`.
    pub fn with_sender(config: &ClientConfig, sender: H) -> RpcResult<Self> {
        let url = Url::parse(&config.url).map_err(|e| {
            RpcError::construction(format!("invalid RPC URL {:?}: {e}", config.url))
        })?;
        debug!(%url, ?config, "creating Transmission RPC client");
        let transport = Transport::new(sender, url, config.credentials.as_ref())?;
        Ok(Self { transport })
    }

    /// The RPC endpoint.
    pub fn url(&self) -> &Url {
        self.transport.url()
    }

    /// The session id learned from the daemon, if a handshake has happened yet.
    pub fn session_id(&self) -> Option<String> {
        let id = self.transport.session_id();
        id.to_str().ok().filter(|id| !id.is_empty()).map(str::to_owned)
    }

    /// Sends any request from the [`requests`](crate::requests) catalog.
    pub async fn call<M: RpcMethod>(&self, request: &M) -> RpcResult<M::Response> {
        self.transport.execute(request).await
    }

    /// Runs one of the selector-only torrent actions.
    pub async fn torrent_action(
        &self,
        action: TorrentAction,
        ids: impl Into<TorrentSelector>,
    ) -> RpcResult<()> {
        let request = TorrentActionRequest {
            action,
            ids: ids.into(),
        };
        debug!("Sending {} for {:?}", action.method(), request.ids);
        self.call(&request).await?;
        debug!("{} command sent", action.method());
        Ok(())
    }

    /// Starts torrents, respecting the queue.
    pub async fn start(&self, ids: impl Into<TorrentSelector>) -> RpcResult<()> {
        self.torrent_action(TorrentAction::Start, ids).await
    }

    /// Starts torrents immediately, bypassing the queue.
    pub async fn start_now(&self, ids: impl Into<TorrentSelector>) -> RpcResult<()> {
        self.torrent_action(TorrentAction::StartNow, ids).await
    }

    /// Stops torrents.
    pub async fn stop(&self, ids: impl Into<TorrentSelector>) -> RpcResult<()> {
        self.torrent_action(TorrentAction::Stop, ids).await
    }

    /// Queues torrents for verification of their local data.
    pub async fn verify(&self, ids: impl Into<TorrentSelector>) -> RpcResult<()> {
        self.torrent_action(TorrentAction::Verify, ids).await
    }

    /// Asks the daemon to announce torrents to their trackers now.
    pub async fn reannounce(&self, ids: impl Into<TorrentSelector>) -> RpcResult<()> {
        self.torrent_action(TorrentAction::Reannounce, ids).await
    }

    /// Adds a torrent. Adding one the daemon already has is not an error; check
    /// [`AddedTorrent::is_duplicate`].
    pub async fn add_torrent(&self, request: &AddTorrent) -> RpcResult<AddedTorrent> {
        match request.filename() {
            Some(filename) => debug!("Adding torrent from {filename}"),
            None => debug!("Adding torrent from metainfo"),
        }
        let added = self.call(request).await?;
        debug!("Added {added:?}");
        Ok(added)
    }

    /// Removes torrents, optionally deleting their data.
    pub async fn remove_torrents(
        &self,
        ids: impl Into<TorrentSelector>,
        delete_local_data: bool,
    ) -> RpcResult<()> {
        let request = RemoveTorrents {
            ids: ids.into(),
            delete_local_data,
        };
        debug!(
            "Removing torrents {:?}, delete_local_data={delete_local_data}",
            request.ids
        );
        self.call(&request).await?;
        debug!("Remove command sent");
        Ok(())
    }

    /// Points torrents at a new data directory, moving the data there if `move_data` is set.
    pub async fn set_location(
        &self,
        ids: impl Into<TorrentSelector>,
        location: impl Into<String>,
        move_data: bool,
    ) -> RpcResult<()> {
        let request = SetLocation {
            ids: ids.into(),
            location: location.into(),
            move_data,
        };
        debug!(
            "Moving torrents {:?} to {}, move_data={move_data}",
            request.ids, request.location
        );
        self.call(&request).await?;
        debug!("Set-location command sent");
        Ok(())
    }

    /// Renames a file or directory inside one torrent.
    pub async fn rename_path(
        &self,
        id: TorrentId,
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> RpcResult<RenamedPath> {
        let request = RenamePath::new(id, path, name);
        debug!(
            "Renaming {} to {} in torrent {}",
            request.path,
            request.name,
            request.id()
        );
        let renamed = self.call(&request).await?;
        debug!("Renamed {renamed:?}");
        Ok(renamed)
    }

    /// Changes properties of torrents.
    ///
    /// Read-only fields present in the mutation are sent anyway and logged at `warn`; the
    /// daemon ignores them.
    pub async fn set_torrents(
        &self,
        ids: impl Into<TorrentSelector>,
        mutation: TorrentMutation,
    ) -> RpcResult<()> {
        warn_read_only("torrent-set", &mutation.fields);
        let request = SetTorrents {
            ids: ids.into(),
            mutation,
        };
        debug!("Setting {} on torrents {:?}", request.mutation.fields, request.ids);
        self.call(&request).await?;
        debug!("Set command sent");
        Ok(())
    }

    /// Reads `fields` of the selected torrents.
    ///
    /// Duplicate fields are requested once. Fields that were not requested are absent in the
    /// returned records. The daemon decides the order of the records; it need not match the
    /// order of the selector, so request [`TorrentFields::ID`](transrpc_types::TorrentFields::ID)
    /// or [`TorrentFields::HASH_STRING`](transrpc_types::TorrentFields::HASH_STRING) to tell
    /// them apart.
    pub async fn get_torrents(
        &self,
        ids: impl Into<TorrentSelector>,
        fields: &[FieldId<TorrentRecord>],
    ) -> RpcResult<Vec<TorrentRecord>> {
        let list = self.fetch_torrents(ids.into(), fields).await?;
        Ok(list.torrents)
    }

    /// Reads `fields` of recently active torrents, along with the torrents removed in the
    /// same window.
    pub async fn recently_active(
        &self,
        fields: &[FieldId<TorrentRecord>],
    ) -> RpcResult<TorrentList> {
        self.fetch_torrents(TorrentSelector::RecentlyActive, fields)
            .await
    }

    async fn fetch_torrents(
        &self,
        ids: TorrentSelector,
        fields: &[FieldId<TorrentRecord>],
    ) -> RpcResult<TorrentList> {
        if fields.is_empty() {
            return Err(RpcError::construction(
                "torrent-get needs at least one field",
            ));
        }
        let request = GetTorrents {
            ids,
            fields: wire_keys(fields),
        };
        debug!("Getting {:?} of torrents {:?}", request.fields, request.ids);
        let list = self.call(&request).await?;
        debug!(
            "Got {} torrents, {} removed",
            list.torrents.len(),
            list.removed.len()
        );
        Ok(list)
    }

    /// Moves torrents within the queue.
    pub async fn queue_move(
        &self,
        direction: QueueMove,
        ids: impl Into<TorrentSelector>,
    ) -> RpcResult<()> {
        let request = QueueMoveRequest {
            direction,
            ids: ids.into(),
        };
        debug!("Moving torrents {:?} with {}", request.ids, direction.method());
        self.call(&request).await?;
        debug!("Queue move sent");
        Ok(())
    }

    /// Reads session settings. An empty field list reads all of them.
    pub async fn get_session(&self, fields: &[FieldId<SessionRecord>]) -> RpcResult<SessionRecord> {
        let request = GetSession {
            fields: wire_keys(fields),
        };
        debug!("Getting session fields {:?}", request.fields);
        let session = self.call(&request).await?;
        debug!("Session: {session}");
        Ok(session)
    }

    /// Writes every present field of `record`.
    ///
    /// Read-only fields are sent anyway and logged at `warn`; the daemon ignores them.
    pub async fn set_session(&self, record: SessionRecord) -> RpcResult<()> {
        warn_read_only("session-set", &record);
        debug!("Setting session fields {record}");
        self.call(&SetSession(record)).await?;
        debug!("Session updated");
        Ok(())
    }

    /// Reads transfer statistics.
    pub async fn session_stats(&self) -> RpcResult<SessionStats> {
        debug!("Getting session statistics");
        let stats = self.call(&GetSessionStats).await?;
        debug!("Session statistics: {stats:?}");
        Ok(stats)
    }

    /// Refetches the blocklist and returns its new rule count.
    pub async fn update_blocklist(&self) -> RpcResult<u64> {
        debug!("Updating blocklist");
        let size = self.call(&BlocklistUpdate).await?.size;
        debug!("Blocklist has {size} rules");
        Ok(size)
    }

    /// Asks the daemon whether its peer port is reachable.
    pub async fn test_port(&self, ip_protocol: Option<IpProtocol>) -> RpcResult<PortTestResult> {
        debug!("Testing peer port, protocol {ip_protocol:?}");
        let result = self.call(&PortTest { ip_protocol }).await?;
        debug!("Port test: {result:?}");
        Ok(result)
    }

    /// Shuts the daemon down.
    pub async fn close_session(&self) -> RpcResult<()> {
        debug!("Closing session");
        self.call(&CloseSession).await?;
        debug!("Session close sent");
        Ok(())
    }

    /// Reads free space in a directory on the daemon host.
    pub async fn free_space(&self, path: impl Into<String>) -> RpcResult<FreeSpaceResult> {
        let request = FreeSpace { path: path.into() };
        debug!("Getting free space in {}", request.path);
        let result = self.call(&request).await?;
        debug!("Free space: {result:?}");
        Ok(result)
    }

    /// Creates or updates a bandwidth group.
    pub async fn set_group(&self, group: BandwidthGroup) -> RpcResult<()> {
        debug!("Setting bandwidth group {group:?}");
        self.call(&SetGroup(group)).await?;
        debug!("Bandwidth group set");
        Ok(())
    }

    /// Reads bandwidth groups; all of them when `names` is `None`.
    pub async fn get_groups(&self, names: Option<Vec<String>>) -> RpcResult<Vec<BandwidthGroup>> {
        debug!("Getting bandwidth groups {names:?}");
        let groups = self.call(&GetGroups { group: names }).await?.group;
        debug!("Bandwidth groups: {groups:?}");
        Ok(groups)
    }
}

fn warn_read_only<R: FieldRecord>(method: &str, record: &R) {
    let read_only = record.present_read_only_fields();
    if !read_only.is_empty() {
        warn!(
            method,
            fields = ?read_only,
            "request sets read-only fields, the daemon will ignore them"
        );
    }
}
