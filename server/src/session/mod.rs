use std::sync::Arc;

use comms::{command::UserCommand, transport};
use nanoid::nanoid;
use tokio::{net::TcpStream, sync::broadcast};
use tokio_stream::StreamExt;

use crate::registry::RoomRegistry;

use self::room_session::RoomSession;

mod room_session;

/// Given a tcp stream and the room registry, handles one editor connection
/// until the client disconnects, misbehaves, or the server shuts down.
///
/// The first line on the wire must be an `attach` command naming the room;
/// every protocol event after that is routed to that room's state, and the
/// room's broadcasts flow back out over the same stream.
pub async fn handle_session(
    room_registry: Arc<RoomRegistry>,
    mut quit_rx: broadcast::Receiver<()>,
    stream: TcpStream,
) -> anyhow::Result<()> {
    let connection_id = nanoid!();
    // Split the tcp stream into a command stream and an event writer with better ergonomics
    let (mut commands, mut event_writer) = transport::server::split_tcp_stream(stream);

    // Scope the connection to its room before any protocol event flows
    let room_id = match commands.next().await {
        Some(Ok(UserCommand::Attach(cmd))) => cmd.room,
        Some(Ok(_)) => {
            return Err(anyhow::anyhow!(
                "connection sent protocol events before attaching to a room"
            ));
        }
        Some(Err(err)) => return Err(err),
        // Closed before attaching: nothing to clean up
        None => return Ok(()),
    };

    let room = room_registry.attach(&room_id).await;
    let mut room_session = RoomSession::new(&connection_id, room).await;
    println!("connection {} attached to room '{}'", connection_id, room_id);

    loop {
        tokio::select! {
            cmd = commands.next() => match cmd {
                // The transport reported a disconnect, which is the defined
                // trigger for removing this connection's presence
                None => {
                    room_session.leave().await;
                    println!("connection {} disconnected", connection_id);
                    break;
                }
                Some(Ok(cmd)) => {
                    if let Err(err) = room_session.handle_command(cmd).await {
                        room_session.leave().await;
                        return Err(err);
                    }
                }
                // A malformed line only takes down this session, never the
                // process; the departure is still announced
                Some(Err(err)) => {
                    room_session.leave().await;
                    return Err(err);
                }
            },
            // Broadcasts from the room, already filtered down to this connection
            Ok(event) = room_session.recv() => {
                if let Err(err) = event_writer.write(&event).await {
                    room_session.leave().await;
                    return Err(err);
                }
            }
            // If the server is shutting down, we can just close the tcp
            // streams; every session is going away, so no departure
            // broadcasts are needed
            Ok(_) = quit_rx.recv() => {
                drop(event_writer);
                println!("Gracefully shutting down user tcp stream.");
                break;
            }
        }
    }

    Ok(())
}
