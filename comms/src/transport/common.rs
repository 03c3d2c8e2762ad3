use std::pin::Pin;

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_stream::Stream;

pub const NEW_LINE: &[u8; 2] = b"\r\n";

pub type BoxedStream<Item> = Pin<Box<dyn Stream<Item = Item> + Send>>;

/// Serialize one payload as a single JSON line and flush it to the writer.
/// Both directions of the transport frame their traffic this way.
pub(super) async fn write_json_line<W, T>(writer: &mut W, payload: &T) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut serialized_bytes = serde_json::to_vec(payload)?;
    serialized_bytes.extend_from_slice(NEW_LINE);

    writer.write_all(serialized_bytes.as_slice()).await?;

    Ok(())
}
