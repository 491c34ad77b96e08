//! Wire protocol shared by server and client.

pub mod codec;
mod messages;

pub use codec::{FrameReader, FrameWriter};
pub use messages::*;
