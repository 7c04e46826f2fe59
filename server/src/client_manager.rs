//! Session management for the arena server
//!
//! This module tracks who is connected and turns unreliable datagrams into
//! an ordered, exactly-once command stream per session:
//! - Session lifecycle (connect, disconnect, timeout)
//! - Stable session ids handed to the simulation as player ids
//! - Per-session command sequencing that drops duplicates and late packets
//! - Capacity limits and address lookup for outbound routing

use log::{debug, info};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// One connected session
#[derive(Debug)]
pub struct Client {
    /// Session id assigned by the server, also used as the player id
    pub id: u32,
    /// Network address for sending responses
    pub addr: SocketAddr,
    /// Last time we received any packet from this client
    pub last_seen: Instant,
    /// Highest command sequence number applied so far, None before the first
    pub last_sequence: Option<u32>,
}

impl Client {
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
            last_sequence: None,
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Accepts a command only if its sequence is newer than anything applied.
    ///
    /// Duplicated or reordered datagrams are rejected, which gives the
    /// simulation each session's commands exactly once and in send order.
    pub fn accept_sequence(&mut self, sequence: u32) -> bool {
        self.touch();
        if self.last_sequence.is_some_and(|last| sequence <= last) {
            return false;
        }
        self.last_sequence = Some(sequence);
        true
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Manages all connected sessions
///
/// Ids start at 1 and are never reused while the server runs, so a
/// reconnecting client always gets a fresh player.
pub struct ClientManager {
    clients: HashMap<u32, Client>,
    next_client_id: u32,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Returns Some(client_id) if successful, None if the server is full.
    pub fn add_client(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} connected from {}", client_id, addr);
        self.clients.insert(client_id, Client::new(client_id, addr));

        Some(client_id)
    }

    pub fn remove_client(&mut self, client_id: &u32) -> bool {
        if let Some(client) = self.clients.remove(client_id) {
            info!("Client {} disconnected", client.id);
            true
        } else {
            false
        }
    }

    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    pub fn get_client_addr(&self, client_id: u32) -> Option<SocketAddr> {
        self.clients.get(&client_id).map(|client| client.addr)
    }

    /// Refreshes activity for a heartbeat. Returns false for unknown ids.
    pub fn touch(&mut self, client_id: u32) -> bool {
        match self.clients.get_mut(&client_id) {
            Some(client) => {
                client.touch();
                true
            }
            None => false,
        }
    }

    /// Gate for sequenced commands; false for unknown ids and stale sequences.
    pub fn accept_command(&mut self, client_id: u32, sequence: u32) -> bool {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return false;
        };

        let accepted = client.accept_sequence(sequence);
        if !accepted {
            debug!(
                "Dropping stale command {} from client {} (last {:?})",
                sequence, client_id, client.last_sequence
            );
        }
        accepted
    }

    /// Removes sessions silent for longer than `timeout` and returns their ids.
    pub fn check_timeouts(&mut self, timeout: Duration) -> Vec<u32> {
        let timed_out: Vec<u32> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(timeout))
            .map(|(id, _)| *id)
            .collect();

        for client_id in &timed_out {
            self.remove_client(client_id);
        }

        timed_out
    }

    pub fn get_client_addrs(&self) -> Vec<(u32, SocketAddr)> {
        self.clients
            .iter()
            .map(|(id, client)| (*id, client.addr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
