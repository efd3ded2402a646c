//! Protocol-level tests against the real `weather-mcp` binary
//!
//! Drives the server over its actual stdio transport with raw JSON-RPC
//! lines, the way any MCP client would.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use serde_json::{Value, json};

/// A spawned server with piped stdio, killed on drop.
struct ServerUnderTest {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ServerUnderTest {
    fn spawn() -> Self {
        let mut child = Command::new(cargo_bin("weather-mcp"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn weather-mcp");
        let stdin = child.stdin.take().expect("stdin piped");
        let stdout = BufReader::new(child.stdout.take().expect("stdout piped"));
        Self {
            child,
            stdin,
            stdout,
        }
    }

    /// Send one raw line; expect no response (notifications).
    fn send(&mut self, line: &str) {
        writeln!(self.stdin, "{}", line).expect("write to server");
        self.stdin.flush().expect("flush to server");
    }

    /// Send one raw line and read the next response line.
    fn request(&mut self, line: &str) -> Value {
        self.send(line);
        let mut response = String::new();
        self.stdout.read_line(&mut response).expect("read response");
        serde_json::from_str(response.trim()).expect("response is JSON")
    }
}

impl Drop for ServerUnderTest {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn initialize(server: &mut ServerUnderTest) -> Value {
    let response = server.request(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#,
    );
    server.send(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#);
    response
}

#[test]
fn initialize_reports_capabilities_and_server_info() {
    let mut server = ServerUnderTest::spawn();
    let response = initialize(&mut server);

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "weather-mcp");
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[test]
fn tools_list_publishes_all_three_tools_in_order() {
    let mut server = ServerUnderTest::spawn();
    initialize(&mut server);

    let response = server.request(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#);
    let tools = response["result"]["tools"].as_array().unwrap();

    let names: Vec<&str> = tools
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["get_current_weather", "get_forecast", "list_available_cities"]
    );

    // Every tool carries a schema; the weather lookups require `city`.
    for tool in tools.iter().take(2) {
        assert_eq!(tool["inputSchema"]["required"], json!(["city"]));
    }
    assert_eq!(tools[2]["inputSchema"]["properties"], json!({}));
}

#[test]
fn tools_call_returns_city_report_as_text() {
    let mut server = ServerUnderTest::spawn();
    initialize(&mut server);

    let response = server.request(
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"get_current_weather","arguments":{"city":"tokyo"}}}"#,
    );

    assert!(response["result"].get("is_error").is_none());
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("\"city\": \"Tokyo\""));
    assert!(text.contains("\"temperature\": 68"));
    assert!(text.contains("Fahrenheit"));
}

#[test]
fn tools_call_unknown_city_is_error_result_not_crash() {
    let mut server = ServerUnderTest::spawn();
    initialize(&mut server);

    let response = server.request(
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_forecast","arguments":{"city":"atlantis"}}}"#,
    );

    assert_eq!(response["result"]["is_error"], true);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Weather data not available for 'atlantis'"));

    // The serving loop survives the bad call.
    let next = server.request(
        r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"list_available_cities","arguments":{}}}"#,
    );
    let text = next["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("New York"));
    assert!(text.contains("Sydney"));
}

#[test]
fn unknown_method_yields_method_not_found() {
    let mut server = ServerUnderTest::spawn();
    initialize(&mut server);

    let response =
        server.request(r#"{"jsonrpc":"2.0","id":6,"method":"resources/list","params":{}}"#);
    assert_eq!(response["error"]["code"], -32601);
}

#[test]
fn server_binary_reports_version() {
    let mut cmd = assert_cmd::Command::cargo_bin("weather-mcp").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("weather-mcp"));
}
