//! Tests for the TransmissionClient.

use std::io;

use mockall::Sequence;
use reqwest::StatusCode;
use serde_json::json;
use transrpc_types::{
    AuthFailure, Optional, RpcError, SessionFields, SessionRecord, Speed, TorrentFields,
    TorrentId, TorrentSelector, TorrentStatus,
};

use super::TransmissionClient;
use crate::requests::{AddTorrent, QueueMove, TorrentMutation};
use crate::testutil::{
    CapturedLogs, body_json, header, make_conflict, make_response, make_stats, make_success,
    test_config,
};
use crate::transport::{MockHttpSend, SESSION_ID_HEADER};

fn client_with(mock: MockHttpSend) -> TransmissionClient<MockHttpSend> {
    TransmissionClient::with_sender(&test_config(), mock).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_handshake_retries_once_with_new_session_id() {
    let mut mock = MockHttpSend::new();
    let mut seq = Sequence::new();

    mock.expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|request| header(request, SESSION_ID_HEADER) == Some(&b""[..]))
        .returning(|_| Ok(make_conflict("abc")));
    mock.expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|request| header(request, SESSION_ID_HEADER) == Some(&b"abc"[..]))
        .returning(|_| Ok(make_success(make_stats())));

    let client = client_with(mock);
    assert_eq!(client.session_id(), None);

    let stats = client.session_stats().await.unwrap();

    assert_eq!(stats.active_torrent_count, 1);
    assert_eq!(stats.download_speed, Speed::from_kilobytes_per_second(1.0));
    assert_eq!(client.session_id().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_session_id_is_reused_after_handshake() {
    let mut mock = MockHttpSend::new();
    let mut seq = Sequence::new();

    mock.expect_send()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(make_conflict("abc")));
    mock.expect_send()
        .times(2)
        .in_sequence(&mut seq)
        .withf(|request| header(request, SESSION_ID_HEADER) == Some(&b"abc"[..]))
        .returning(|_| Ok(make_success(json!({}))));

    let client = client_with(mock);
    client.stop(TorrentSelector::All).await.unwrap();
    client.start(TorrentId::local(1)).await.unwrap();
}

#[tokio::test]
async fn test_second_conflict_is_protocol_error() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .times(2)
        .returning(|_| Ok(make_conflict("abc")));

    let client = client_with(mock);
    let result = client.session_stats().await;

    match result.unwrap_err() {
        RpcError::Protocol(msg) => assert!(msg.contains("session id")),
        other => panic!("Expected Protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_conflict_without_session_id_is_protocol_error() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .times(1)
        .returning(|_| Ok(make_response(StatusCode::CONFLICT, json!({}))));

    let client = client_with(mock);
    let result = client.session_stats().await;

    match result.unwrap_err() {
        RpcError::Protocol(msg) => assert!(msg.contains(SESSION_ID_HEADER)),
        other => panic!("Expected Protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_without_credentials() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| header(request, "authorization").is_none())
        .returning(|_| Ok(make_response(StatusCode::UNAUTHORIZED, json!({}))));

    let client = client_with(mock);
    let result = client.session_stats().await;

    assert!(matches!(
        result.unwrap_err(),
        RpcError::Authentication(AuthFailure::MissingCredentials)
    ));
}

#[tokio::test]
async fn test_unauthorized_with_credentials() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| {
            header(request, "authorization") == Some(&b"Basic YWRtaW46aHVudGVyMg=="[..])
        })
        .returning(|_| Ok(make_response(StatusCode::UNAUTHORIZED, json!({}))));

    let config = test_config().with_credentials("admin", "hunter2").unwrap();
    let client = TransmissionClient::with_sender(&config, mock).unwrap();
    let result = client.session_stats().await;

    assert!(matches!(
        result.unwrap_err(),
        RpcError::Authentication(AuthFailure::RejectedCredentials)
    ));
}

#[tokio::test]
async fn test_forbidden_is_whitelist_error() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .times(1)
        .returning(|_| Ok(make_response(StatusCode::FORBIDDEN, json!({}))));

    let client = client_with(mock);
    let result = client.stop(TorrentSelector::All).await;

    assert!(matches!(
        result.unwrap_err(),
        RpcError::Authentication(AuthFailure::AddressNotWhitelisted)
    ));
}

#[tokio::test]
async fn test_operation_failed_carries_result() {
    let mut mock = MockHttpSend::new();

    mock.expect_send().returning(|_| {
        Ok(make_response(
            StatusCode::OK,
            json!({"result": "error: duplicate torrent"}),
        ))
    });

    let client = client_with(mock);
    let result = client.verify(TorrentId::local(3)).await;

    match result.unwrap_err() {
        RpcError::OperationFailed(msg) => assert_eq!(msg, "error: duplicate torrent"),
        other => panic!("Expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_other_status_still_decodes_envelope() {
    let mut mock = MockHttpSend::new();

    mock.expect_send().returning(|_| {
        Ok(make_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"result": "success"}),
        ))
    });

    let client = client_with(mock);
    assert!(client.reannounce(TorrentSelector::RecentlyActive).await.is_ok());
}

#[tokio::test]
async fn test_transport_error_is_surfaced() {
    let mut mock = MockHttpSend::new();

    mock.expect_send().times(1).returning(|_| {
        Err(RpcError::transport(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )))
    });

    let client = client_with(mock);
    let result = client.close_session().await;

    assert!(matches!(result.unwrap_err(), RpcError::Transport(_)));
}

#[tokio::test]
async fn test_get_torrents_deduplicates_fields() {
    let mut mock = MockHttpSend::new();
    let hash = "a".repeat(40);

    mock.expect_send()
        .withf(|request| {
            body_json(request)
                == json!({
                    "method": "torrent-get",
                    "arguments": {"ids": [7], "fields": ["id", "name", "status"]},
                    "tag": 1,
                })
        })
        .returning(move |_| {
            Ok(make_success(json!({
                "torrents": [{"id": 7, "name": "ubuntu.iso", "status": 4, "hashString": hash}]
            })))
        });

    let client = client_with(mock);
    let torrents = client
        .get_torrents(
            TorrentId::local(7),
            &[
                TorrentFields::ID.id(),
                TorrentFields::NAME.id(),
                TorrentFields::ID.id(),
                TorrentFields::STATUS.id(),
            ],
        )
        .await
        .unwrap();

    assert_eq!(torrents.len(), 1);
    let torrent = &torrents[0];
    assert_eq!(TorrentFields::NAME.get(torrent).map(String::as_str), Some("ubuntu.iso"));
    assert_eq!(
        TorrentFields::STATUS.get(torrent),
        Some(&TorrentStatus::Downloading)
    );
    assert!(torrent.percent_done.is_absent());
}

#[tokio::test]
async fn test_get_torrents_without_fields_sends_nothing() {
    let mut mock = MockHttpSend::new();

    mock.expect_send().times(0);

    let client = client_with(mock);
    let result = client.get_torrents(TorrentSelector::All, &[]).await;

    assert!(matches!(result.unwrap_err(), RpcError::Construction(_)));
}

#[tokio::test]
async fn test_recently_active_reports_removed() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| body_json(request)["arguments"]["ids"] == json!("recently-active"))
        .returning(|_| Ok(make_success(json!({"torrents": [], "removed": [3]}))));

    let client = client_with(mock);
    let list = client
        .recently_active(&[TorrentFields::ID.id()])
        .await
        .unwrap();

    assert!(list.torrents.is_empty());
    assert_eq!(list.removed, vec![TorrentId::Local(3)]);
}

#[tokio::test]
async fn test_set_session_warns_about_read_only_fields_and_still_sends() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .times(1)
        .withf(|request| {
            body_json(request)["arguments"] == json!({"version": "4.0.5", "peer-port": 51413})
        })
        .returning(|_| Ok(make_success(json!({}))));

    let mut record = SessionRecord::default();
    SessionFields::VERSION.set(&mut record, "4.0.5".to_owned());
    SessionFields::PEER_PORT.set(&mut record, 51413);

    let client = client_with(mock);
    assert!(client.set_session(record).await.is_ok());

    let warnings = logs.warnings();
    assert_eq!(warnings.len(), 1, "{}", logs.contents());
    assert!(warnings[0].contains("read-only"), "{}", warnings[0]);
    assert!(warnings[0].contains("version"), "{}", warnings[0]);
    assert!(!warnings[0].contains("peer-port"), "{}", warnings[0]);
}

#[tokio::test]
async fn test_set_session_with_writable_fields_does_not_warn() {
    let logs = CapturedLogs::default();
    let _guard = logs.install();
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .times(1)
        .returning(|_| Ok(make_success(json!({}))));

    let mut record = SessionRecord::default();
    SessionFields::PEER_PORT.set(&mut record, 51413);

    let client = client_with(mock);
    assert!(client.set_session(record).await.is_ok());

    assert!(logs.warnings().is_empty(), "{}", logs.contents());
    assert!(logs.contents().contains("Session updated"));
}

#[tokio::test]
async fn test_get_session_without_fields_requests_all() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| body_json(request)["arguments"] == json!({}))
        .returning(|_| Ok(make_success(json!({"version": "4.0.5", "rpc-version": 17}))));

    let client = client_with(mock);
    let session = client.get_session(&[]).await.unwrap();

    assert_eq!(session.version, Optional::Present("4.0.5".to_owned()));
    assert_eq!(session.rpc_version, Optional::Present(17));
    assert!(session.download_dir.is_absent());
}

#[tokio::test]
async fn test_add_torrent_duplicate() {
    let mut mock = MockHttpSend::new();
    let hash = "b".repeat(40);

    mock.expect_send()
        .withf(|request| {
            body_json(request)["arguments"]
                == json!({"filename": "magnet:?xt=urn:btih:bbbb", "paused": true})
        })
        .returning(move |_| {
            Ok(make_success(json!({
                "torrent-duplicate": {"id": 2, "name": "dup", "hashString": hash}
            })))
        });

    let mut request = AddTorrent::from_url("magnet:?xt=urn:btih:bbbb").unwrap();
    request.paused = Some(true);

    let client = client_with(mock);
    let added = client.add_torrent(&request).await.unwrap();

    assert!(added.is_duplicate);
    assert_eq!(added.id, 2);
    assert_eq!(added.name, "dup");
}

#[tokio::test]
async fn test_set_torrents_sends_mutation() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| {
            body_json(request)["arguments"]
                == json!({"ids": [1, 2], "downloadLimit": 100, "downloadLimited": true})
        })
        .returning(|_| Ok(make_success(json!({}))));

    let mutation = TorrentMutation::default()
        .set(
            TorrentFields::DOWNLOAD_LIMIT,
            Speed::from_kilobytes_per_second(100.0),
        )
        .set(TorrentFields::DOWNLOAD_LIMITED, true);

    let client = client_with(mock);
    let ids = TorrentSelector::from(vec![TorrentId::local(1), TorrentId::local(2)]);
    assert!(client.set_torrents(ids, mutation).await.is_ok());
}

#[tokio::test]
async fn test_queue_move_uses_direction_method() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| body_json(request)["method"] == json!("queue-move-bottom"))
        .returning(|_| Ok(make_success(json!({}))));

    let client = client_with(mock);
    assert!(client
        .queue_move(QueueMove::Bottom, TorrentId::local(5))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_update_blocklist_returns_size() {
    let mut mock = MockHttpSend::new();

    mock.expect_send()
        .withf(|request| body_json(request).get("arguments").is_none())
        .returning(|_| Ok(make_success(json!({"blocklist-size": 4096}))));

    let client = client_with(mock);
    assert_eq!(client.update_blocklist().await.unwrap(), 4096);
}

#[test]
fn test_invalid_url_is_construction_error() {
    let config = crate::config::ClientConfig::new("not a url");
    let result = TransmissionClient::with_sender(&config, MockHttpSend::new());
    assert!(matches!(result.unwrap_err(), RpcError::Construction(_)));
}
