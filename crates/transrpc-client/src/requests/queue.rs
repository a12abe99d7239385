use serde::Serialize;
use transrpc_types::TorrentSelector;

use super::{NoArguments, RpcMethod};

/// Direction of a queue move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueMove {
    /// To the front of the queue.
    Top,
    /// One position towards the front.
    Up,
    /// One position towards the back.
    Down,
    /// To the back of the queue.
    Bottom,
}

impl QueueMove {
    /// The method name for this direction.
    pub const fn method(self) -> &'static str {
        match self {
            Self::Top => "queue-move-top",
            Self::Up => "queue-move-up",
            Self::Down => "queue-move-down",
            Self::Bottom => "queue-move-bottom",
        }
    }
}

/// `queue-move-*`: moves torrents within the download or seed queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueMoveRequest {
    /// Direction of the move.
    #[serde(skip)]
    pub direction: QueueMove,
    /// Torrents to move.
    #[serde(skip_serializing_if = "TorrentSelector::is_all")]
    pub ids: TorrentSelector,
}

impl RpcMethod for QueueMoveRequest {
    type Response = NoArguments;

    fn method(&self) -> &'static str {
        self.direction.method()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use transrpc_types::TorrentId;

    use super::*;

    #[test]
    fn each_direction_has_its_own_method() {
        let methods: Vec<_> = [QueueMove::Top, QueueMove::Up, QueueMove::Down, QueueMove::Bottom]
            .into_iter()
            .map(QueueMove::method)
            .collect();
        assert_eq!(
            methods,
            ["queue-move-top", "queue-move-up", "queue-move-down", "queue-move-bottom"]
        );
    }

    #[test]
    fn direction_is_not_an_argument() {
        let request = QueueMoveRequest {
            direction: QueueMove::Down,
            ids: TorrentSelector::single(TorrentId::local(4)),
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"ids": [4]}));
        assert_eq!(request.method(), "queue-move-down");
    }
}
