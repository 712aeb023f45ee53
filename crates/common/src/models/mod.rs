pub mod inbound;
pub mod signal;

pub use inbound::{InboundImage, MessageRef};
pub use signal::{Direction, ParsedSignal};
