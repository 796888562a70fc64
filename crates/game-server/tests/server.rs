use std::time::Duration;

use assert_approx_eq::assert_approx_eq;
use game_core::Application;
use game_protocol::parse_game;
use game_server::server;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

const CONFIG: &str = r#"{
    "maps": [
        {
            "id": "map1",
            "name": "Map 1",
            "roads": [{ "x0": 0, "y0": 0, "x1": 40 }],
            "buildings": [{ "x": 5, "y": 5, "w": 30, "h": 20 }],
            "offices": [{ "id": "o0", "x": 40, "y": 30, "offsetX": 5, "offsetY": 0 }]
        },
        {
            "id": "town",
            "name": "Town",
            "dogSpeed": 2.5,
            "roads": [{ "x0": 0, "y0": 0, "y1": 10 }]
        }
    ]
}"#;

async fn start(tick_period: Option<Duration>) -> String {
    let game = parse_game(CONFIG).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(server::serve(listener, Application::new(game), tick_period, 16));
    addr
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: &str) -> Client {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        Client {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send_raw(&mut self, text: &str) {
        self.writer.write_all(text.as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
            .await
            .expect("response timed out")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn call(&mut self, request: Value) -> Value {
        self.send_raw(&format!("{}\n", request)).await;
        self.recv().await
    }

    async fn join(&mut self, name: &str, map: &str) -> String {
        let resp = self
            .call(json!({ "command": "join", "userName": name, "mapId": map }))
            .await;
        assert_eq!(resp["ok"], true, "{resp}");
        resp["result"]["authToken"].as_str().unwrap().to_string()
    }
}

fn error_code(resp: &Value) -> &str {
    assert_eq!(resp["ok"], false, "{resp}");
    resp["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn dog_walks_and_stops_at_road_end() {
    let addr = start(None).await;
    let mut c = Client::connect(&addr).await;

    let resp = c
        .call(json!({ "command": "join", "userName": "Rex", "mapId": "map1" }))
        .await;
    assert_eq!(resp["ok"], true);
    let token = resp["result"]["authToken"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 32);
    assert_eq!(resp["result"]["playerId"], 0);

    let resp = c
        .call(json!({ "command": "move", "token": token, "move": "R" }))
        .await;
    assert_eq!(resp, json!({ "ok": true, "result": {} }));

    let resp = c.call(json!({ "command": "tick", "timeDelta": 1000 })).await;
    assert_eq!(resp["ok"], true);

    let state = c.call(json!({ "command": "getState", "token": token })).await;
    let dog = &state["result"]["players"]["0"];
    assert_approx_eq!(dog["pos"][0].as_f64().unwrap(), 1.0);
    assert_approx_eq!(dog["pos"][1].as_f64().unwrap(), 0.0);
    assert_approx_eq!(dog["speed"][0].as_f64().unwrap(), 1.0);
    assert_eq!(dog["dir"], "R");

    c.call(json!({ "command": "tick", "timeDelta": 100000 })).await;
    let state = c.call(json!({ "command": "getState", "token": token })).await;
    let dog = &state["result"]["players"]["0"];
    assert_approx_eq!(dog["pos"][0].as_f64().unwrap(), 40.4);
    assert_approx_eq!(dog["speed"][0].as_f64().unwrap(), 0.0);
    assert_eq!(dog["dir"], "R");
}

#[tokio::test]
async fn errors_carry_stable_codes() {
    let addr = start(None).await;
    let mut c = Client::connect(&addr).await;

    c.send_raw("this is not json\n").await;
    assert_eq!(error_code(&c.recv().await), "badRequest");

    let resp = c.call(json!({ "command": "teleport" })).await;
    assert_eq!(error_code(&resp), "badRequest");

    let resp = c
        .call(json!({ "command": "join", "userName": "", "mapId": "map1" }))
        .await;
    assert_eq!(error_code(&resp), "invalidName");
    assert_eq!(resp["error"]["message"], "Invalid name");

    let resp = c
        .call(json!({ "command": "join", "userName": "Rex", "mapId": "nowhere" }))
        .await;
    assert_eq!(error_code(&resp), "mapNotFound");

    let resp = c.call(json!({ "command": "getState" })).await;
    assert_eq!(error_code(&resp), "invalidToken");

    let resp = c
        .call(json!({ "command": "getState", "token": "not-a-token" }))
        .await;
    assert_eq!(error_code(&resp), "invalidToken");

    let resp = c
        .call(json!({ "command": "listPlayers", "token": "0".repeat(32) }))
        .await;
    assert_eq!(error_code(&resp), "unknownToken");

    let token = c.join("Rex", "map1").await;
    let resp = c
        .call(json!({ "command": "move", "token": token, "move": "X" }))
        .await;
    assert_eq!(error_code(&resp), "invalidArgument");

    let resp = c.call(json!({ "command": "tick", "timeDelta": 0 })).await;
    assert_eq!(error_code(&resp), "invalidArgument");

    let resp = c.call(json!({ "command": "getMap", "mapId": "nowhere" })).await;
    assert_eq!(error_code(&resp), "mapNotFound");
}

#[tokio::test]
async fn pipelined_requests_are_answered_in_order() {
    let addr = start(None).await;
    let mut c = Client::connect(&addr).await;

    let batch = [
        json!({ "command": "listMaps" }).to_string(),
        "garbage".to_string(),
        json!({ "command": "join", "userName": "Rex", "mapId": "map1" }).to_string(),
        json!({ "command": "tick", "timeDelta": -5 }).to_string(),
        json!({ "command": "getMap", "mapId": "town" }).to_string(),
    ]
    .join("\n");
    c.send_raw(&format!("{}\n", batch)).await;

    let maps = c.recv().await;
    assert_eq!(
        maps["result"],
        json!([{ "id": "map1", "name": "Map 1" }, { "id": "town", "name": "Town" }])
    );
    assert_eq!(error_code(&c.recv().await), "badRequest");
    assert!(c.recv().await["result"]["authToken"].is_string());
    assert_eq!(error_code(&c.recv().await), "invalidArgument");

    let town = c.recv().await;
    assert_eq!(town["result"]["id"], "town");
    assert_eq!(town["result"]["dogSpeed"], 2.5);
    assert_eq!(town["result"]["roads"], json!([{ "x0": 0, "y0": 0, "y1": 10 }]));
}

#[tokio::test]
async fn clients_share_a_session() {
    let addr = start(None).await;
    let mut a = Client::connect(&addr).await;
    let mut b = Client::connect(&addr).await;

    let token_a = a.join("Rex", "map1").await;
    let token_b = b.join("Rex", "map1").await;
    assert_ne!(token_a, token_b);

    let players = a
        .call(json!({ "command": "listPlayers", "token": token_a }))
        .await;
    assert_eq!(
        players["result"],
        json!({ "0": { "name": "Rex" }, "1": { "name": "Rex" } })
    );

    // A different map is a different session.
    let mut c = Client::connect(&addr).await;
    let token_c = c.join("Fido", "town").await;
    let players = c
        .call(json!({ "command": "listPlayers", "token": token_c }))
        .await;
    assert_eq!(players["result"], json!({ "2": { "name": "Fido" } }));

    let resp = b
        .call(json!({ "command": "checkToken", "token": token_b }))
        .await;
    assert_eq!(resp["ok"], true);
}

#[tokio::test]
async fn concurrent_moves_and_ticks_stay_consistent() {
    let addr = start(None).await;
    let mut setup = Client::connect(&addr).await;
    let token = setup.join("Rex", "map1").await;

    let mover = {
        let addr = addr.clone();
        let token = token.clone();
        tokio::spawn(async move {
            let mut c = Client::connect(&addr).await;
            for i in 0..50 {
                let dir = if i % 2 == 0 { "R" } else { "L" };
                let resp = c
                    .call(json!({ "command": "move", "token": token, "move": dir }))
                    .await;
                assert_eq!(resp["ok"], true);
            }
        })
    };
    let ticker = {
        let addr = addr.clone();
        tokio::spawn(async move {
            let mut c = Client::connect(&addr).await;
            for _ in 0..50 {
                let resp = c.call(json!({ "command": "tick", "timeDelta": 100 })).await;
                assert_eq!(resp["ok"], true);
            }
        })
    };
    mover.await.unwrap();
    ticker.await.unwrap();

    let state = setup
        .call(json!({ "command": "getState", "token": token }))
        .await;
    let dog = &state["result"]["players"]["0"];
    let x = dog["pos"][0].as_f64().unwrap();
    let y = dog["pos"][1].as_f64().unwrap();
    assert!((-0.4..=40.4).contains(&x), "x = {x}");
    assert_approx_eq!(y, 0.0);
}

#[tokio::test]
async fn automatic_ticker_disables_manual_ticks() {
    let addr = start(Some(Duration::from_millis(10))).await;
    let mut c = Client::connect(&addr).await;
    let token = c.join("Rex", "map1").await;

    let resp = c.call(json!({ "command": "tick", "timeDelta": 100 })).await;
    assert_eq!(error_code(&resp), "badRequest");
    assert_eq!(resp["error"]["message"], "Invalid endpoint");

    c.call(json!({ "command": "move", "token": token, "move": "R" }))
        .await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = c.call(json!({ "command": "getState", "token": token })).await;
    let x = state["result"]["players"]["0"]["pos"][0].as_f64().unwrap();
    assert!(x > 0.0, "dog should have moved, x = {x}");
}
