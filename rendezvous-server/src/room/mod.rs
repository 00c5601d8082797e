mod id_generator;
mod room;
mod room_command;
mod room_error;
mod room_registry;

pub use id_generator::*;
pub use room_error::*;
pub use room_registry::*;
