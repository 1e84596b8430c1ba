//! HTTP server lifecycle and graceful shutdown.
//!
//! ```text
//! RoutingConfigured ──bind──▶ Serving ──shutdown──▶ Draining ──▶ Stopped
//!         │                     │
//!         │                     └──accept keeps failing──▶ Draining ──▶ Failed
//!         └──bind error──▶ Failed
//! ```
//!
//! Once shutdown is requested the accept loop stops and the listener is
//! dropped, so no new connections are made. In-flight connections are then
//! given the grace period to finish; whatever is still open afterwards is
//! abandoned and reported as [`ShutdownOutcome::GraceExpired`].
//!
//! Accept errors caused by a single peer are skipped. Any other accept error
//! backs off before retrying, and after [`MAX_ACCEPT_FAILURES`] in a row the
//! server drains and ends in [`Phase::Failed`].

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const ACCEPT_BACKOFF_START: Duration = Duration::from_millis(50);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Consecutive listener-level accept errors tolerated before giving up
pub const MAX_ACCEPT_FAILURES: u32 = 10;

/// Listener address and timeouts
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Time allowed for a client to send request headers
    pub read_timeout: Duration,
    /// Time allowed for a handler to produce its response
    pub write_timeout: Duration,
    /// Grace period for in-flight connections during shutdown
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    RoutingConfigured,
    Serving,
    Draining,
    Stopped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every connection closed within the grace period
    Drained,
    /// The grace period ran out with connections still open
    GraceExpired,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read listener address")]
    LocalAddr(#[source] std::io::Error),
    #[error("listener stopped accepting connections")]
    Accept(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcceptAction {
    /// The error belongs to one peer; accept again right away
    Retry,
    /// The listener itself is in trouble (e.g. out of file descriptors)
    Backoff(Duration),
    Fatal,
}

/// Counts consecutive listener-level accept errors
#[derive(Debug, Default)]
struct AcceptFailures {
    consecutive: u32,
}

impl AcceptFailures {
    fn record(&mut self, err: &io::Error) -> AcceptAction {
        if matches!(
            err.kind(),
            io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::Interrupted
        ) {
            return AcceptAction::Retry;
        }

        self.consecutive += 1;
        if self.consecutive >= MAX_ACCEPT_FAILURES {
            return AcceptAction::Fatal;
        }
        let factor = 1u32 << (self.consecutive - 1).min(5);
        AcceptAction::Backoff(ACCEPT_BACKOFF_START.saturating_mul(factor).min(ACCEPT_BACKOFF_MAX))
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }
}

/// Requests shutdown of a running server. Cheap to clone.
#[derive(Clone)]
pub struct ShutdownHandle {
    requested: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    fn new() -> Self {
        let (requested, _) = watch::channel(false);
        Self {
            requested: Arc::new(requested),
        }
    }

    /// Request shutdown. Returns `true` for the first request only.
    pub fn trigger(&self) -> bool {
        let first = self.requested.send_if_modified(|requested| {
            if *requested {
                false
            } else {
                *requested = true;
                true
            }
        });
        if first {
            info!("Shutdown requested");
        } else {
            debug!("Shutdown already requested, ignoring");
        }
        first
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.requested.subscribe()
    }
}

/// A server with its routes configured but no listener yet
pub struct Server {
    router: Router,
    settings: ServerSettings,
    phase: watch::Sender<Phase>,
    shutdown: ShutdownHandle,
}

impl Server {
    pub fn new(router: Router, settings: ServerSettings) -> Self {
        let (phase, _) = watch::channel(Phase::RoutingConfigured);
        Self {
            router,
            settings,
            phase,
            shutdown: ShutdownHandle::new(),
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = format!("{}:{}", self.settings.host, self.settings.port);
        match TcpListener::bind((self.settings.host.as_str(), self.settings.port)).await {
            Ok(listener) => Ok(BoundServer {
                listener,
                server: self,
            }),
            Err(source) => {
                error!("Unable to bind {}: {}", addr, source);
                self.phase.send_replace(Phase::Failed);
                Err(ServerError::Bind { addr, source })
            }
        }
    }
}

/// A server holding a bound listener, ready to serve
pub struct BoundServer {
    listener: TcpListener,
    server: Server,
}

impl BoundServer {
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.server.shutdown_handle()
    }

    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.server.phase()
    }

    /// Accept connections until shutdown is requested, then drain.
    ///
    /// Returns [`ServerError::Accept`] when the listener kept failing; the
    /// in-flight connections are still drained first.
    pub async fn serve(self) -> Result<ShutdownOutcome, ServerError> {
        let BoundServer { listener, server } = self;
        let Server {
            router,
            settings,
            phase,
            shutdown,
        } = server;

        let mut requested = shutdown.subscribe();
        let graceful = GracefulShutdown::new();

        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new())
            .header_read_timeout(settings.read_timeout);

        phase.send_replace(Phase::Serving);
        match listener.local_addr() {
            Ok(addr) => info!(%addr, "heroes listening"),
            Err(e) => warn!("heroes listening on unknown address: {}", e),
        }

        let mut failures = AcceptFailures::default();
        let mut fatal = None;

        loop {
            let accepted = tokio::select! {
                // Check shutdown first so a request stops accepting even
                // when more connections are queued.
                biased;

                _ = requested.wait_for(|requested| *requested) => break,
                accepted = listener.accept() => accepted,
            };

            let (stream, peer) = match accepted {
                Ok(conn) => {
                    failures.reset();
                    conn
                }
                Err(e) => match failures.record(&e) {
                    AcceptAction::Retry => {
                        debug!("accept error: {}", e);
                        continue;
                    }
                    AcceptAction::Backoff(delay) => {
                        warn!(?delay, "accept error, backing off: {}", e);
                        let stop = tokio::select! {
                            biased;
                            _ = requested.wait_for(|requested| *requested) => true,
                            () = tokio::time::sleep(delay) => false,
                        };
                        if stop {
                            break;
                        }
                        continue;
                    }
                    AcceptAction::Fatal => {
                        error!(
                            "accept failed {} times in a row, giving up: {}",
                            MAX_ACCEPT_FAILURES, e
                        );
                        fatal = Some(e);
                        break;
                    }
                },
            };

            let service = TowerToHyperService::new(router.clone());
            let connection = graceful.watch(http.serve_connection(TokioIo::new(stream), service));

            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    debug!(%peer, "connection error: {}", e);
                }
            });
        }

        drop(listener);
        phase.send_replace(Phase::Draining);
        info!(grace = ?settings.shutdown_timeout, "draining connections");

        let drained = tokio::time::timeout(settings.shutdown_timeout, graceful.shutdown()).await;
        let outcome = match drained {
            Ok(()) => {
                info!("all connections closed");
                ShutdownOutcome::Drained
            }
            Err(_) => {
                warn!(
                    "grace period of {:?} expired with connections still open",
                    settings.shutdown_timeout
                );
                ShutdownOutcome::GraceExpired
            }
        };

        if let Some(e) = fatal {
            phase.send_replace(Phase::Failed);
            return Err(ServerError::Accept(e));
        }

        phase.send_replace(Phase::Stopped);
        info!("heroes stopped");
        Ok(outcome)
    }
}

/// Resolves on the first shutdown signal the process receives
///
/// SIGTERM or Ctrl-C on Unix, Ctrl-C elsewhere. If a handler cannot be
/// installed that source is ignored rather than ending the server.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C"),
        () = sigterm => info!("received SIGTERM"),
    }
}
