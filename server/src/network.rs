//! Server network layer: UDP sessions, command dispatch and the tick loop
//!
//! One task owns the [`GameState`]. Decoded packets, session timeouts and
//! scheduler ticks all arrive at that task and are handled one at a time, so
//! no command, AI step or broadcast ever observes a half-applied change.

use crate::client_manager::ClientManager;
use crate::config::ServerConfig;
use crate::game::{Audience, GameState, Notification};
use crate::health;
use crate::scheduler::{TickKind, TickScheduler};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::{mpsc, RwLock};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Capacity of the inbound queue feeding the game loop
const INBOUND_QUEUE: usize = 1024;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    ClientTimeout { client_id: u32 },
    Shutdown,
}

/// Messages sent from game loop to network tasks
#[derive(Debug)]
pub enum GameMessage {
    SendPacket { packet: Packet, addr: SocketAddr },
    SendToClient { packet: Packet, client_id: u32 },
    BroadcastPacket { packet: Packet, exclude: Option<u32> },
}

impl From<Notification> for GameMessage {
    fn from(notification: Notification) -> Self {
        let packet = notification.packet;
        match notification.audience {
            Audience::All => GameMessage::BroadcastPacket {
                packet,
                exclude: None,
            },
            Audience::AllExcept(client_id) => GameMessage::BroadcastPacket {
                packet,
                exclude: Some(client_id),
            },
            Audience::Only(client_id) => GameMessage::SendToClient { packet, client_id },
        }
    }
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis()
        .min(u64::MAX as u128) as u64
}

/// Main server coordinating networking and game simulation
pub struct Server {
    socket: Arc<UdpSocket>,
    health_listener: Option<TcpListener>,
    clients: Arc<RwLock<ClientManager>>,
    game_state: GameState,
    config: ServerConfig,

    // Communication channels
    server_tx: mpsc::Sender<ServerMessage>,
    server_rx: mpsc::Receiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Result<Self, BoxError> {
        let socket = Arc::new(UdpSocket::bind(&config.bind_addr).await?);
        info!("Game server listening on {}", socket.local_addr()?);

        let health_listener = match &config.health_addr {
            Some(addr) => {
                let listener = TcpListener::bind(addr).await?;
                info!("Health probe listening on {}", listener.local_addr()?);
                Some(listener)
            }
            None => None,
        };

        let (server_tx, server_rx) = mpsc::channel(INBOUND_QUEUE);
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            health_listener,
            clients: Arc::new(RwLock::new(ClientManager::new(config.max_clients))),
            game_state: GameState::new(),
            config,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Address of the liveness probe, if enabled and not yet started.
    pub fn health_addr(&self) -> Option<SocketAddr> {
        self.health_listener
            .as_ref()
            .and_then(|listener| listener.local_addr().ok())
    }

    /// Handle for injecting messages such as [`ServerMessage::Shutdown`].
    pub fn message_sender(&self) -> mpsc::Sender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) = server_tx
                                .send(ServerMessage::PacketReceived { packet, addr })
                                .await
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing packet queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::SendToClient { packet, client_id } => {
                        let addr = {
                            let clients_guard = clients.read().await;
                            clients_guard.get_client_addr(client_id)
                        };

                        let Some(addr) = addr else {
                            debug!("Client {} left before delivery", client_id);
                            continue;
                        };

                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send to client {}: {}", client_id, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.get_client_addrs()
                        };

                        for (client_id, addr) in client_addrs {
                            if Some(client_id) == exclude {
                                continue;
                            }

                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();
        let timeout = self.config.client_timeout;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts(timeout)
                };

                for client_id in timed_out {
                    if let Err(e) = server_tx
                        .send(ServerMessage::ClientTimeout { client_id })
                        .await
                    {
                        error!("Failed to send timeout message: {}", e);
                        return;
                    }
                }
            }
        });
    }

    fn spawn_health_probe(&mut self) {
        if let Some(listener) = self.health_listener.take() {
            tokio::spawn(health::serve(listener));
        }
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), BoxError> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    /// Forwards everything the simulation produced to the sender task
    fn dispatch_notifications(&mut self) {
        for notification in self.game_state.drain_notifications() {
            if let Err(e) = self.game_tx.send(notification.into()) {
                error!("Failed to queue notification: {}", e);
            }
        }
    }

    async fn session_for(&self, addr: SocketAddr) -> Option<u32> {
        let clients = self.clients.read().await;
        clients.find_client_by_addr(addr)
    }

    /// Resolves the session behind a sequenced command, or None if the
    /// command must be dropped.
    async fn accept_command(&self, addr: SocketAddr, sequence: u32) -> Option<u32> {
        let mut clients = self.clients.write().await;
        let client_id = clients.find_client_by_addr(addr)?;
        clients
            .accept_command(client_id, sequence)
            .then_some(client_id)
    }

    /// Processes incoming packets and updates game state
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                info!(
                    "Client connecting from {} (version: {})",
                    addr, client_version
                );

                if client_version != PROTOCOL_VERSION {
                    self.send_packet(
                        Packet::Disconnected {
                            reason: "Protocol version mismatch".to_string(),
                        },
                        addr,
                    );
                    return;
                }

                // Remove existing connection if present
                if let Some(existing_id) = self.session_for(addr).await {
                    info!("Removing existing client {} from {}", existing_id, addr);
                    let mut clients = self.clients.write().await;
                    clients.remove_client(&existing_id);
                    self.game_state.disconnect(existing_id);
                }

                let client_id = {
                    let mut clients = self.clients.write().await;
                    clients.add_client(addr)
                };

                let response = match client_id {
                    Some(client_id) => Packet::Connected { client_id },
                    None => Packet::Disconnected {
                        reason: "Server full".to_string(),
                    },
                };
                self.send_packet(response, addr);
            }

            Packet::Heartbeat => {
                let mut clients = self.clients.write().await;
                if let Some(client_id) = clients.find_client_by_addr(addr) {
                    clients.touch(client_id);
                }
            }

            Packet::Disconnect => {
                if let Some(client_id) = self.session_for(addr).await {
                    let mut clients = self.clients.write().await;
                    clients.remove_client(&client_id);
                    self.game_state.disconnect(client_id);
                }
            }

            command => {
                let Some(sequence) = command.sequence() else {
                    warn!("Unexpected packet type from client at {}", addr);
                    return;
                };
                if let Some(client_id) = self.accept_command(addr, sequence).await {
                    self.apply_command(client_id, command);
                }
            }
        }

        self.dispatch_notifications();
    }

    /// Applies an accepted gameplay command to the session's player
    fn apply_command(&mut self, client_id: u32, command: Packet) {
        match command {
            Packet::ChooseClass { class, .. } => self.game_state.choose_class(client_id, class),
            Packet::Move { x, y, .. } => self.game_state.move_player(client_id, x, y),
            Packet::Attack { x, y, .. } => self.game_state.attack(client_id, x, y),
            Packet::Skill { x, y, .. } => self.game_state.skill(client_id, x, y),
            _ => {}
        }
    }

    /// Handles one inbound message. Returns false once the server should stop.
    async fn handle_message(&mut self, message: Option<ServerMessage>) -> bool {
        match message {
            Some(ServerMessage::PacketReceived { packet, addr }) => {
                self.handle_packet(packet, addr).await;
            }
            Some(ServerMessage::ClientTimeout { client_id }) => {
                info!("Client {} timed out", client_id);
                self.game_state.disconnect(client_id);
                self.dispatch_notifications();
            }
            Some(ServerMessage::Shutdown) | None => {
                info!("Server shutting down");
                return false;
            }
        }
        true
    }

    fn run_simulation_tick(&mut self) {
        self.game_state
            .simulation_tick(self.config.bot_population, self.config.sim_tick_ms());
        self.dispatch_notifications();

        if self.game_state.tick % 500 == 0 {
            debug!(
                "Tick {}: {} players, {} bots",
                self.game_state.tick,
                self.game_state.players.len(),
                self.game_state.bots.len()
            );
        }
    }

    /// Broadcasts the full snapshot to all connected clients
    async fn broadcast_full_state(&mut self) {
        let client_count = {
            let clients = self.clients.read().await;
            clients.len()
        };

        if client_count == 0 {
            return;
        }

        let packet = self.game_state.full_state(current_timestamp());
        if let Err(e) = self.game_tx.send(GameMessage::BroadcastPacket {
            packet,
            exclude: None,
        }) {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), BoxError> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();
        self.spawn_health_probe();

        let mut scheduler = TickScheduler::new(self.config.sim_tick, self.config.broadcast_tick);

        info!(
            "Server started: simulation every {:?}, broadcast every {:?}",
            self.config.sim_tick, self.config.broadcast_tick
        );

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    if !self.handle_message(message).await {
                        break;
                    }
                },

                tick = scheduler.next() => {
                    match tick {
                        TickKind::Simulation => self.run_simulation_tick(),
                        TickKind::Broadcast => self.broadcast_full_state().await,
                    }
                },
            }
        }

        Ok(())
    }
}
