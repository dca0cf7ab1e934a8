//! Room state management: the registry, per-room actors, and
//! connection-id generation.

mod actor;
mod conn_id;
mod registry;

pub use actor::{JoinSnapshot, RoomActor, RoomEvent, RoomInfo};
pub use conn_id::{ConnId, ConnIdGenerator};
pub use registry::{RoomId, RoomRegistry};
