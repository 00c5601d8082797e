mod host_link;
mod ws_host_link;

pub use host_link::*;
pub use ws_host_link::*;
