use std::env;
use std::error::Error;
use std::io::{self, Write};

use game_core::{Command, JoinRequest};
use game_protocol::encode_command;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Turn a shorthand line into a command. `token` is the one from the
/// last successful join.
fn parse_shorthand(line: &str, token: &Option<String>) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let cmd = match parts.next()? {
        "maps" => Command::ListMaps,
        "map" => Command::GetMap {
            map_id: parts.next()?.to_string(),
        },
        "join" => Command::Join(JoinRequest {
            user_name: parts.next()?.to_string(),
            map_id: parts.next()?.to_string(),
        }),
        "move" => Command::Move {
            token: token.clone(),
            direction: parts.next().unwrap_or("").to_string(),
        },
        "tick" => Command::Tick {
            time_delta_ms: parts.next()?.parse().ok()?,
        },
        "players" => Command::ListPlayers { token: token.clone() },
        "state" => Command::GetState { token: token.clone() },
        "check" => Command::CheckToken { token: token.clone() },
        _ => return None,
    };
    Some(cmd)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("GAME_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut responses = BufReader::new(read_half).lines();
    println!("Connected.");
    println!("Commands:");
    println!("  maps | map <id> | join <name> <mapId>");
    println!("  move <L|R|U|D|> | tick <ms> | players | state | check");
    println!("Lines starting with '{{' are sent as raw JSON.");
    println!("Type 'quit' or 'exit' to leave.\n");

    let stdin = io::stdin();
    let mut token: Option<String> = None;

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        let request = if trimmed.starts_with('{') {
            trimmed.to_string()
        } else {
            match parse_shorthand(trimmed, &token) {
                Some(cmd) => encode_command(&cmd),
                None => {
                    eprintln!("Could not parse command.");
                    continue;
                }
            }
        };

        write_half.write_all(request.as_bytes()).await?;
        write_half.write_all(b"\n").await?;

        let Some(response) = responses.next_line().await? else {
            println!("Server closed the connection.");
            break;
        };
        println!("<< {}", response);

        // Remember the token from a join.
        if let Ok(value) = serde_json::from_str::<Value>(&response) {
            if let Some(t) = value["result"]["authToken"].as_str() {
                token = Some(t.to_string());
            }
        }
    }

    Ok(())
}
