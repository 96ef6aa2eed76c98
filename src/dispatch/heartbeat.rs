/*! Coordinator control channel: ASCII UDP datagrams (spec.md §6). A
worker sends `"a <id> [<type>]"` while alive and `"f <id>"` once finished;
`"Notify"` is the name-server keep-alive, out of scope for this crate's
core but parsed here so a message from either source doesn't corrupt the
coordinator's read loop.
!*/
use std::net::UdpSocket;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatMsg {
    Alive { worker_id: u32, kind: Option<String> },
    Finished { worker_id: u32 },
    NameServerNotify,
}

impl HeartbeatMsg {
    pub fn encode(&self) -> String {
        match self {
            HeartbeatMsg::Alive { worker_id, kind: None } => format!("a {worker_id}"),
            HeartbeatMsg::Alive { worker_id, kind: Some(k) } => format!("a {worker_id} {k}"),
            HeartbeatMsg::Finished { worker_id } => format!("f {worker_id}"),
            HeartbeatMsg::NameServerNotify => "Notify".to_string(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "Notify" {
            return Some(HeartbeatMsg::NameServerNotify);
        }
        let mut parts = s.split_whitespace();
        match parts.next()? {
            "a" => {
                let worker_id = parts.next()?.parse().ok()?;
                let kind = parts.next().map(str::to_string);
                Some(HeartbeatMsg::Alive { worker_id, kind })
            }
            "f" => {
                let worker_id = parts.next()?.parse().ok()?;
                Some(HeartbeatMsg::Finished { worker_id })
            }
            _ => None,
        }
    }
}

/// A background task that periodically sends `"a <id>"` to the
/// coordinator. Read-only with respect to worker state: the only mutable
/// data it touches is the mutex-guarded `last_sent` counter, so it never
/// races with the worker's own output writes (spec.md §5).
pub struct HeartbeatSender {
    socket: UdpSocket,
    coordinator_addr: std::net::SocketAddr,
    worker_id: u32,
    sent_count: Mutex<u64>,
}

impl HeartbeatSender {
    pub fn new(coordinator_addr: std::net::SocketAddr, worker_id: u32) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(HeartbeatSender {
            socket,
            coordinator_addr,
            worker_id,
            sent_count: Mutex::new(0),
        })
    }

    pub fn send_alive(&self) -> std::io::Result<()> {
        let msg = HeartbeatMsg::Alive { worker_id: self.worker_id, kind: None };
        self.socket.send_to(msg.encode().as_bytes(), self.coordinator_addr)?;
        *self.sent_count.lock().unwrap() += 1;
        Ok(())
    }

    pub fn send_finished(&self) -> std::io::Result<()> {
        let msg = HeartbeatMsg::Finished { worker_id: self.worker_id };
        self.socket.send_to(msg.encode().as_bytes(), self.coordinator_addr)?;
        Ok(())
    }

    pub fn sent_count(&self) -> u64 {
        *self.sent_count.lock().unwrap()
    }
}
