//! Rendezvous relay: pairs one publisher's offer with one joiner's answer.
//!
//! A publisher `POST`s its offer and gets a short room id back, then keeps a
//! WebSocket open on that id. A joiner reads the offer, posts its answer, and
//! the relay pushes that answer down the publisher's socket exactly once
//! before forgetting the room. Rooms nobody pairs expire on their own.

mod config;
mod error;
mod room;
mod server;
mod signaling;
mod transport;

pub use config::*;
pub use error::*;
pub use room::*;
pub use server::*;
pub use signaling::*;
pub use transport::*;
