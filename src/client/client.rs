//! TCP client implementation.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::net::TcpStream;

use crate::protocol::{ClientMessage, FrameReader, FrameWriter, ServerMessage};

use super::render::{render, resolve_choice};

type StdinLines = tokio::io::Lines<BufReader<Stdin>>;

/// Run the quiz client until the game finishes or the server goes away.
pub async fn run(host: String, port: u16, username: Option<String>) -> anyhow::Result<()> {
    let stream = TcpStream::connect((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to connect to {}:{}", host, port))?;
    println!("Connected to server {}:{}", host, port);

    let (read_half, write_half) = stream.into_split();
    let mut reader = FrameReader::new(read_half);
    let mut writer = FrameWriter::new(write_half);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let username = match username {
        Some(name) => name,
        None => prompt_username(&mut stdin).await?,
    };
    writer
        .send(&ClientMessage::Hi {
            username: Some(username),
        })
        .await?;

    loop {
        let msg = match reader.next::<ServerMessage>().await {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                println!("Connection closed by server.");
                break;
            }
            Err(e) if e.is_decode_failure() => continue,
            Err(e) => return Err(e).context("lost connection to server"),
        };

        println!("{}", render(&msg));

        match msg {
            ServerMessage::Question {
                qid,
                choices,
                time_allowed,
                ..
            } => {
                let answer = ask_answer(&mut stdin, &choices, time_allowed).await?;
                writer.send(&ClientMessage::Answer { qid, answer }).await?;
            }
            ServerMessage::Finished { .. } => break,
            _ => {}
        }
    }

    Ok(())
}

async fn prompt_username(stdin: &mut StdinLines) -> anyhow::Result<String> {
    print!("Enter your username: ");
    std::io::stdout().flush()?;

    let typed = stdin.next_line().await?.unwrap_or_default();
    let typed = typed.trim();
    if typed.is_empty() {
        Ok(format!("Player{}", std::process::id() % 1000))
    } else {
        Ok(typed.to_string())
    }
}

async fn ask_answer(
    stdin: &mut StdinLines,
    choices: &[String],
    time_allowed: u64,
) -> anyhow::Result<String> {
    print!(
        "Your answer (1-{}), you have {}s: ",
        choices.len(),
        time_allowed
    );
    std::io::stdout().flush()?;

    match tokio::time::timeout(Duration::from_secs(time_allowed), stdin.next_line()).await {
        Ok(line) => Ok(resolve_choice(&line?.unwrap_or_default(), choices)),
        Err(_) => {
            println!("\nTime is up (no answer). Sending empty answer.");
            Ok(String::new())
        }
    }
}
