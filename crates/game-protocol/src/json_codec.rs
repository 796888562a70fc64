// crates/game-protocol/src/json_codec.rs

//! Line-oriented JSON codec.
//!
//! Requests (one object per line → [`Command`]):
//!
//! - `{"command":"listMaps"}`
//! - `{"command":"getMap","mapId":"map1"}`
//! - `{"command":"join","userName":"Rex","mapId":"map1"}`
//! - `{"command":"move","token":"<32 hex>","move":"R"}`
//! - `{"command":"tick","timeDelta":100}`
//! - `{"command":"listPlayers","token":"..."}`
//! - `{"command":"getState","token":"..."}`
//! - `{"command":"checkToken","token":"..."}`
//!
//! Responses:
//!
//! - success: `{"ok":true,"result":<payload>}`
//! - failure: `{"ok":false,"error":{"code":"mapNotFound","message":"Map not found"}}`

use game_core::{AppError, Command, CommandOutput, JoinRequest};
use serde_json::{json, Map as JsonObject, Value};

use crate::wire_types::{MapJson, MapSummaryJson};

// -----------------------------------------------------------------------------
// Decoding
// -----------------------------------------------------------------------------

/// Parse one request line into a [`Command`].
///
/// Envelope problems (not JSON, not an object, missing or unknown
/// `command`) are `BadRequest`. Missing or ill-typed fields of a known
/// command are `InvalidArgument`.
pub fn decode_command(line: &str) -> Result<Command, AppError> {
    let value: Value = serde_json::from_str(line.trim())
        .map_err(|_| AppError::bad_request("Invalid JSON"))?;
    let obj = value
        .as_object()
        .ok_or_else(|| AppError::bad_request("Request must be a JSON object"))?;
    let name = obj
        .get("command")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::bad_request("Missing command"))?;

    match name {
        "listMaps" => Ok(Command::ListMaps),
        "getMap" => Ok(Command::GetMap {
            map_id: required_str(obj, "mapId")?,
        }),
        "join" => Ok(Command::Join(JoinRequest {
            user_name: required_str(obj, "userName")?,
            map_id: required_str(obj, "mapId")?,
        })),
        "move" => Ok(Command::Move {
            token: token_field(obj),
            direction: required_str(obj, "move")
                .map_err(|_| AppError::invalid_argument("Failed to parse action"))?,
        }),
        "tick" => {
            let time_delta_ms = obj
                .get("timeDelta")
                .and_then(Value::as_u64)
                .ok_or_else(|| AppError::invalid_argument("Failed to parse tick request JSON"))?;
            Ok(Command::Tick { time_delta_ms })
        }
        "listPlayers" => Ok(Command::ListPlayers {
            token: token_field(obj),
        }),
        "getState" => Ok(Command::GetState {
            token: token_field(obj),
        }),
        "checkToken" => Ok(Command::CheckToken {
            token: token_field(obj),
        }),
        other => Err(AppError::bad_request(format!("Unknown command: {}", other))),
    }
}

fn required_str(obj: &JsonObject<String, Value>, field: &str) -> Result<String, AppError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::invalid_argument(format!("Missing or invalid field: {}", field)))
}

/// A token that is present but not a string is kept as an empty one so
/// the facade rejects it as invalid rather than missing.
fn token_field(obj: &JsonObject<String, Value>) -> Option<String> {
    obj.get("token").map(|v| v.as_str().unwrap_or_default().to_string())
}

/// Inverse of [`decode_command`]. Used by clients and tests.
pub fn encode_command(command: &Command) -> String {
    let value = match command {
        Command::ListMaps => json!({ "command": "listMaps" }),
        Command::GetMap { map_id } => json!({ "command": "getMap", "mapId": map_id }),
        Command::Join(req) => json!({
            "command": "join",
            "userName": req.user_name,
            "mapId": req.map_id,
        }),
        Command::Move { token, direction } => {
            let mut v = json!({ "command": "move", "move": direction });
            put_token(&mut v, token);
            v
        }
        Command::Tick { time_delta_ms } => json!({ "command": "tick", "timeDelta": time_delta_ms }),
        Command::ListPlayers { token } => {
            let mut v = json!({ "command": "listPlayers" });
            put_token(&mut v, token);
            v
        }
        Command::GetState { token } => {
            let mut v = json!({ "command": "getState" });
            put_token(&mut v, token);
            v
        }
        Command::CheckToken { token } => {
            let mut v = json!({ "command": "checkToken" });
            put_token(&mut v, token);
            v
        }
    };
    value.to_string()
}

fn put_token(value: &mut Value, token: &Option<String>) {
    if let (Some(obj), Some(token)) = (value.as_object_mut(), token) {
        obj.insert("token".to_string(), Value::String(token.clone()));
    }
}

// -----------------------------------------------------------------------------
// Encoding
// -----------------------------------------------------------------------------

/// JSON payload of a successful command.
///
/// - `Maps`    → `[{"id","name"}]`
/// - `Map`     → full map description
/// - `Joined`  → `{"authToken","playerId"}`
/// - `Players` → `{"<id>":{"name"}}`
/// - `State`   → `{"players":{"<id>":{"pos":[x,y],"speed":[vx,vy],"dir":"U"}}}`
/// - `Done`    → `{}`
pub fn encode_output(output: &CommandOutput) -> Value {
    match output {
        CommandOutput::Maps(maps) => {
            let list: Vec<MapSummaryJson> = maps
                .iter()
                .map(|m| MapSummaryJson {
                    id: m.id.as_str().to_string(),
                    name: m.name.clone(),
                })
                .collect();
            json!(list)
        }
        CommandOutput::Map(map) => json!(MapJson::from(map.as_ref())),
        CommandOutput::Joined(joined) => json!({
            "authToken": joined.token.as_str(),
            "playerId": joined.player_id.0,
        }),
        CommandOutput::Players(players) => {
            let mut obj = JsonObject::new();
            for p in players {
                obj.insert(p.id.to_string(), json!({ "name": p.name }));
            }
            Value::Object(obj)
        }
        CommandOutput::State(dogs) => {
            let mut obj = JsonObject::new();
            for d in dogs {
                obj.insert(
                    d.id.to_string(),
                    json!({
                        "pos": [d.position.x, d.position.y],
                        "speed": [d.velocity.x, d.velocity.y],
                        "dir": d.direction.as_str(),
                    }),
                );
            }
            json!({ "players": obj })
        }
        CommandOutput::Done => json!({}),
    }
}

pub fn encode_error(err: &AppError) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": err.code(),
            "message": err.to_string(),
        }
    })
}

/// One response line, without the trailing newline.
pub fn encode_response(result: &Result<CommandOutput, AppError>) -> String {
    let value = match result {
        Ok(output) => json!({ "ok": true, "result": encode_output(output) }),
        Err(err) => encode_error(err),
    };
    value.to_string()
}
