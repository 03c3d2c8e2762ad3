use std::time::Duration;

use comms::{
    command::{self, UserCommand},
    event::Event,
    presence::{CursorPosition, UserPresence},
    transport,
};
use nanoid::nanoid;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;
use tokio::{net::TcpStream, task::JoinSet};
use tokio_stream::StreamExt;

/// Typing Swarm for the Room Server
///
/// Spawns synthetic editors which all attach to the same room and keep
/// typing into the shared document while moving their cursors around.
/// Useful for eyeballing fan-out behavior and for generating load.
///
/// !IMPORTANT! Be sure to check and configure your socket limits, before you run this

const SERVER_ADDR: &str = "localhost:4000";
const ROOM_ID: &str = "swarm";
// How many synthetic editors to spawn
const EDITOR_COUNT: usize = 50;
// How many milliseconds to wait between the keystrokes of one editor
const TYPING_DELAY_MILLIS: u64 = 1_000;

// The palette the real client picks its display color from
const COLORS: [&str; 10] = [
    "#549EF9", "#3056FB", "#51BF8D", "#D77829", "#D644D3", "#9300D3", "#2968CF", "#52B5DA",
    "#775DDB", "#BE5250",
];

async fn spawn_single_editor(editor_index: usize) -> anyhow::Result<()> {
    let result = spawn_single_editor_raw(editor_index).await;

    match result.as_ref() {
        Ok(_) => println!("exited without problems"),
        Err(err) => println!("some error occurred = {}", err),
    }

    result
}

async fn spawn_single_editor_raw(editor_index: usize) -> anyhow::Result<()> {
    let tcp_stream = TcpStream::connect(SERVER_ADDR).await?;
    let (mut event_stream, mut command_writer) = transport::client::split_tcp_stream(tcp_stream);

    let mut rng = StdRng::from_entropy();
    let user = UserPresence {
        id: nanoid!(),
        username: format!("editor-{}", editor_index),
        color: String::from(COLORS[rng.gen_range(0..COLORS.len())]),
        pos: CursorPosition { line: 0, ch: 0 },
    };

    command_writer
        .write(&UserCommand::Attach(command::AttachCommand {
            room: String::from(ROOM_ID),
        }))
        .await?;
    command_writer
        .write(&UserCommand::Enter(command::EnterCommand {
            user: user.clone(),
        }))
        .await?;

    // our own join broadcast echoes back with the document snapshot; other
    // editors' broadcasts may arrive first and carry nothing for us
    let mut document = loop {
        match event_stream.next().await {
            Some(Ok(Event::Enter(event))) => {
                if let Some(text) = event.document_for(&user.id) {
                    break String::from(text);
                }
            }
            Some(Ok(_)) => continue,
            _ => return Err(anyhow::anyhow!("server did not send the join broadcast")),
        }
    };

    let join_handle = tokio::spawn({
        let to_sleep = Duration::from_millis(TYPING_DELAY_MILLIS);

        async move {
            // sleep initially for a time to distribute the typing times
            tokio::time::sleep(Duration::from_millis(rng.gen_range(1..TYPING_DELAY_MILLIS)))
                .await;

            loop {
                let typed = nanoid!(4);
                let at = document.len();
                document.push_str(&typed);

                let _ = command_writer
                    .write(&UserCommand::Message(command::EditCommand {
                        changes: json!({ "from": { "line": 0, "ch": at }, "text": [typed] }),
                        doc_value: document.clone(),
                    }))
                    .await;

                let _ = command_writer
                    .write(&UserCommand::UpdateUser(command::UpdateUserCommand {
                        user: UserPresence {
                            pos: CursorPosition {
                                line: 0,
                                ch: document.len(),
                            },
                            ..user.clone()
                        },
                    }))
                    .await;

                tokio::time::sleep(to_sleep).await;
            }
        }
    });

    // keep draining relayed deltas and presence echoes until disconnected
    let mut received: u64 = 0;
    while event_stream.next().await.is_some() {
        received += 1;
        if received % 1_000 == 0 {
            println!("editor-{} received {} events", editor_index, received);
        }
    }

    join_handle.abort();
    Ok(())
}

#[tokio::main]
async fn main() {
    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();

    for editor_index in 0..EDITOR_COUNT {
        join_set.spawn(spawn_single_editor(editor_index));
    }

    println!("total editors: {}", EDITOR_COUNT);

    while join_set.join_next().await.is_some() {}
}
