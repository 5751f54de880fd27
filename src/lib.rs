#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod history;
#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod pinger;
#[cfg(feature = "std")]
pub mod poller;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod screen;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod submitter;
#[cfg(feature = "std")]
pub mod terminal;
#[cfg(feature = "std")]
pub mod transport;

pub use history::CommandHistory;
#[cfg(feature = "std")]
pub use client::{GameClient, SessionSummary};
#[cfg(feature = "std")]
pub use config::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, parse_level};
#[cfg(feature = "std")]
pub use pinger::KeepAlive;
#[cfg(feature = "std")]
pub use poller::{OutputPoller, PollOutcome};
#[cfg(feature = "std")]
pub use protocol::{OutputMessage, CONNECTION_LOST_NOTICE};
#[cfg(feature = "std")]
pub use screen::{render, ContainerListeners, MemoryScreen, Screen, SharedScreen};
#[cfg(feature = "std")]
pub use session::SessionId;
#[cfg(feature = "std")]
pub use submitter::{CommandSubmitter, Key, KeyOutcome};
#[cfg(feature = "std")]
pub use transport::{http::HttpTransport, scripted::ScriptedTransport, Transport, TransportError};
