//! Tests against a real `transmission-daemon`.
//!
//! The daemon-backed tests are ignored by default; run them with `cargo test -- --ignored` on a
//! machine with `transmission-daemon` on the `PATH`. Each test starts its own daemon on its
//! own port with a throwaway config directory.

#![allow(unused_crate_dependencies)]
#![allow(missing_docs)]

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use transrpc_client::requests::{AddTorrent, QueueMove, TorrentMutation};
use transrpc_client::{ClientConfig, TransmissionClient};
use transrpc_types::{
    Optional, RpcError, SessionFields, SessionRecord, Speed, TorrentFields, TorrentId,
    TorrentSelector,
};

const MAGNET_HASH: &str = "0123456789abcdef0123456789abcdef01234567";

struct ForkingDaemonGuard {
    pidfile: PathBuf,
    pid: i32,
    port: u16,
}

impl ForkingDaemonGuard {
    fn start_transmission(workdir: &Path, port: u16) -> io::Result<Self> {
        let pidfile = workdir.join("transmission.pid");
        let config_dir = workdir.join("config");
        let download_dir = workdir.join("complete");
        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&download_dir)?;

        Command::new("transmission-daemon")
            .arg("-x")
            .arg(&pidfile)
            .arg("-g")
            .arg(&config_dir)
            .arg("-w")
            .arg(&download_dir)
            .args(["-p", &port.to_string(), "-T", "--no-portmap", "--no-dht"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        wait_for_file(&pidfile, Duration::from_secs(3))?;
        let pid = read_pid(&pidfile)?;

        let guard = Self { pidfile, pid, port };
        guard.wait_tcp_ready("127.0.0.1", Duration::from_secs(5))?;
        Ok(guard)
    }

    fn wait_tcp_ready(&self, host: &str, timeout: Duration) -> io::Result<()> {
        use std::net::{TcpStream, ToSocketAddrs};

        let addr = (host, self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no address"))?;

        let start = Instant::now();
        while start.elapsed() < timeout {
            if TcpStream::connect_timeout(&addr, Duration::from_millis(150)).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(50));
        }
        Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "daemon did not become ready in time",
        ))
    }

    fn client(&self) -> TransmissionClient {
        let url = format!("http://127.0.0.1:{}/transmission/rpc", self.port);
        TransmissionClient::try_new(&ClientConfig::new(url)).unwrap()
    }
}

impl Drop for ForkingDaemonGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            unsafe {
                libc::kill(self.pid as libc::pid_t, libc::SIGTERM);
            }

            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                let alive = unsafe { libc::kill(self.pid as libc::pid_t, 0) } == 0;
                if !alive {
                    break;
                }
                thread::sleep(Duration::from_millis(50));
            }

            unsafe {
                libc::kill(self.pid as libc::pid_t, libc::SIGKILL);
            }
        }

        let _ = fs::remove_file(&self.pidfile);
    }
}

fn wait_for_file(path: &Path, timeout: Duration) -> io::Result<()> {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(25));
    }
    Err(io::Error::new(io::ErrorKind::TimedOut, "pidfile not created"))
}

fn read_pid(path: &Path) -> io::Result<i32> {
    let s = fs::read_to_string(path)?;
    s.trim()
        .parse::<i32>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn init_test_tracing() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Connecting to a port nobody listens on fails with a transport error.
#[tokio::test(flavor = "current_thread")]
async fn connection_refused_is_transport_error() {
    init_test_tracing();

    let config = ClientConfig::new("http://127.0.0.1:19999/transmission/rpc");
    let client = TransmissionClient::try_new(&config).unwrap();
    let result = client.session_stats().await;

    match result {
        Err(RpcError::Transport(_)) => {}
        other => panic!("Expected Transport error, got: {other:?}"),
    }
}

/// An invalid RPC URL is rejected before anything is sent.
#[tokio::test(flavor = "current_thread")]
async fn invalid_rpc_url_is_construction_error() {
    init_test_tracing();

    let result = TransmissionClient::try_new(&ClientConfig::new("not-a-valid-url"));

    match result {
        Err(RpcError::Construction(msg)) => {
            assert!(msg.contains("invalid RPC URL"), "got: {msg}");
        }
        other => panic!("Expected Construction error, got: {other:?}"),
    }
}

/// Session settings, statistics and the misc session methods against a fresh daemon.
#[cfg(unix)]
#[tokio::test(flavor = "current_thread")]
#[ignore = "needs transmission-daemon"]
async fn daemon_session_roundtrip() -> io::Result<()> {
    init_test_tracing();

    let tmp = tempfile::tempdir()?;
    let guard = ForkingDaemonGuard::start_transmission(tmp.path(), 9191)?;
    let client = guard.client();

    let session = client
        .get_session(&[SessionFields::VERSION.id(), SessionFields::RPC_VERSION.id()])
        .await
        .unwrap();
    assert!(session.version.is_present());
    assert!(session.download_dir.is_absent());
    assert!(client.session_id().is_some());

    let mut record = SessionRecord::default();
    SessionFields::SPEED_LIMIT_DOWN.set(&mut record, Speed::from_kilobytes_per_second(250.0));
    SessionFields::SPEED_LIMIT_DOWN_ENABLED.set(&mut record, true);
    client.set_session(record).await.unwrap();

    let session = client
        .get_session(&[
            SessionFields::SPEED_LIMIT_DOWN.id(),
            SessionFields::SPEED_LIMIT_DOWN_ENABLED.id(),
        ])
        .await
        .unwrap();
    assert_eq!(
        session.speed_limit_down,
        Optional::Present(Speed::from_kilobytes_per_second(250.0))
    );
    assert_eq!(session.speed_limit_down_enabled, Optional::Present(true));

    let stats = client.session_stats().await.unwrap();
    assert_eq!(stats.torrent_count, 0);

    let download_dir = tmp.path().join("complete");
    let free = client
        .free_space(download_dir.to_str().unwrap())
        .await
        .unwrap();
    assert!(free.size_bytes.bytes() > 0);

    Ok(())
}

/// Add a paused magnet link, inspect it, change it and remove it.
#[cfg(unix)]
#[tokio::test(flavor = "current_thread")]
#[ignore = "needs transmission-daemon"]
async fn daemon_torrent_lifecycle() -> io::Result<()> {
    init_test_tracing();

    let tmp = tempfile::tempdir()?;
    let guard = ForkingDaemonGuard::start_transmission(tmp.path(), 9192)?;
    let client = guard.client();

    let mut request =
        AddTorrent::from_url(format!("magnet:?xt=urn:btih:{MAGNET_HASH}&dn=lifecycle")).unwrap();
    request.paused = Some(true);
    let added = client.add_torrent(&request).await.unwrap();
    assert!(!added.is_duplicate);
    assert_eq!(added.hash_string.as_str(), MAGNET_HASH);

    let again = client.add_torrent(&request).await.unwrap();
    assert!(again.is_duplicate);
    assert_eq!(again.id, added.id);

    let id = added.torrent_id();
    let mutation =
        TorrentMutation::default().set(TorrentFields::LABELS, vec!["linux".to_owned()]);
    client.set_torrents(id.clone(), mutation).await.unwrap();
    client.queue_move(QueueMove::Top, id.clone()).await.unwrap();

    let torrents = client
        .get_torrents(
            id.clone(),
            &[
                TorrentFields::ID.id(),
                TorrentFields::HASH_STRING.id(),
                TorrentFields::LABELS.id(),
                TorrentFields::STATUS.id(),
            ],
        )
        .await
        .unwrap();
    assert_eq!(torrents.len(), 1);
    let torrent = &torrents[0];
    assert_eq!(torrent.id, Optional::Present(added.id));
    assert_eq!(
        TorrentFields::LABELS.get(torrent),
        Some(&vec!["linux".to_owned()])
    );
    assert!(torrent.name.is_absent());

    client.stop(id.clone()).await.unwrap();
    client.remove_torrents(id, true).await.unwrap();

    let torrents = client
        .get_torrents(TorrentSelector::All, &[TorrentFields::ID.id()])
        .await
        .unwrap();
    assert!(torrents.is_empty());

    Ok(())
}

/// Garbage metainfo is refused by the daemon, not by the client.
#[cfg(unix)]
#[tokio::test(flavor = "current_thread")]
#[ignore = "needs transmission-daemon"]
async fn daemon_rejects_invalid_metainfo() -> io::Result<()> {
    init_test_tracing();

    let tmp = tempfile::tempdir()?;
    let guard = ForkingDaemonGuard::start_transmission(tmp.path(), 9193)?;
    let client = guard.client();

    let request = AddTorrent::from_metainfo_bytes(b"this is not valid bencode data").unwrap();
    let result = client.add_torrent(&request).await;

    match result {
        Err(RpcError::OperationFailed(_)) => {}
        other => panic!("Expected OperationFailed, got: {other:?}"),
    }

    Ok(())
}

/// The daemon silently ignores unknown ids for selector-only actions.
#[cfg(unix)]
#[tokio::test(flavor = "current_thread")]
#[ignore = "needs transmission-daemon"]
async fn daemon_ignores_unknown_ids() -> io::Result<()> {
    init_test_tracing();

    let tmp = tempfile::tempdir()?;
    let guard = ForkingDaemonGuard::start_transmission(tmp.path(), 9194)?;
    let client = guard.client();

    let unknown = TorrentId::hash("f".repeat(40)).unwrap();
    client.stop(unknown.clone()).await.unwrap();
    client.remove_torrents(unknown, false).await.unwrap();

    Ok(())
}
