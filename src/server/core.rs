use log::{error, info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::UdpSocket;

use crate::config::ReflectorConfig;
use crate::error::ReflectorError;
use crate::error::handlers::{handle_error, is_fatal};
use crate::protocol::packets::MAX_PACKET_LENGTH;
use crate::registry::ClientRegistry;
use crate::server::relay::{Outbound, Relay};
use crate::server::session::PeerSession;
use crate::server::sweeper::sweep;

pub struct Reflector {
    socket: UdpSocket,
    relay: Relay,
    config: Arc<ReflectorConfig>,
}

impl Reflector {
    /// Binds the UDP socket described by `config`.
    ///
    /// The config is used as given; `ReflectorConfig::load` is where it gets validated.
    pub async fn bind(config: ReflectorConfig) -> Result<Self, ReflectorError> {
        let addr = config.socket_addr();

        let socket = match UdpSocket::bind(&addr).await {
            Ok(socket) => {
                info!("Reflector bound to {}", socket.local_addr()?);
                socket
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(e.into());
            }
        };

        let registry = Arc::new(ClientRegistry::new());
        let relay = Relay::new(registry, &config);

        Ok(Self {
            socket,
            relay,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ReflectorError> {
        Ok(self.socket.local_addr()?)
    }

    /// Shared handle to the client registry, for the admin console.
    pub fn registry(&self) -> Arc<ClientRegistry<PeerSession>> {
        Arc::clone(self.relay.registry())
    }

    /// Serves until ctrl-c.
    pub async fn run(&self) -> Result<(), ReflectorError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serves until `shutdown` completes or the registry turns out inconsistent.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), ReflectorError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut sweep_timer = tokio::time::interval(self.config.sweep_interval());
        // One spare byte so an oversized datagram keeps a length the parser rejects.
        let mut buf = [0u8; MAX_PACKET_LENGTH + 1];

        info!(
            "Starting {} ({}) on {}, timeout {}s",
            self.config.name,
            self.config.status_id(),
            self.local_addr()?,
            self.config.client_timeout_secs
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down with {} clients linked", self.relay.registry().len());
                    return Ok(());
                }
                _ = sweep_timer.tick() => {
                    let registry = self.relay.registry();
                    if let Err(e) = sweep(registry, Instant::now(), self.config.client_timeout()) {
                        let e = ReflectorError::from(e);
                        handle_error(&e);
                        return Err(e);
                    }
                }
                received = self.socket.recv_from(&mut buf) => {
                    let (len, from) = match received {
                        Ok(received) => received,
                        Err(e) => {
                            // ICMP errors from departed peers surface here on some platforms.
                            warn!("Failed to receive: {}", e);
                            continue;
                        }
                    };

                    match self.relay.handle_packet(&buf[..len], from, Instant::now()) {
                        Ok(Some(outbound)) => self.send(&outbound).await,
                        Ok(None) => {}
                        Err(e) if is_fatal(&e) => {
                            handle_error(&e);
                            return Err(e);
                        }
                        Err(e) => handle_error(&e),
                    }
                }
            }
        }
    }

    async fn send(&self, outbound: &Outbound) {
        for target in &outbound.targets {
            if let Err(e) = self.socket.send_to(&outbound.payload, target).await {
                warn!("Failed to send to {}: {}", target, e);
            }
        }
    }
}
