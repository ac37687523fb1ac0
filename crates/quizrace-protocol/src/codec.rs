//! Codec trait and implementations for serializing events.
//!
//! The gateway doesn't care how events become bytes — it only needs
//! something implementing [`Codec`]. [`JsonCodec`] is the default and the
//! only format current clients speak; a binary codec could be added
//! later without touching the room or gateway layers.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts wire types to bytes and back.
///
/// `Send + Sync + 'static` because the codec is shared across connection
/// handler tasks for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use quizrace_protocol::{ClientEvent, Codec, JsonCodec, RoomId};
///
/// let codec = JsonCodec;
/// let event = ClientEvent::Join {
///     room_id: RoomId::from("r1"),
///     username: "Alice".into(),
/// };
///
/// let bytes = codec.encode(&event).unwrap();
/// let decoded: ClientEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(event, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
