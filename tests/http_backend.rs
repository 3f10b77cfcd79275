//! `ChatService` against a local HTTP server speaking the chat-completions
//! wire format, so requests and replies cross a real socket.

use galactic_quest::{ChatService, ExecutionService, RunConfig, StepError, role};
use serde_json::{Value, json};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// One request as the server saw it.
#[derive(Debug)]
struct Captured {
    request_line: String,
    authorization: Option<String>,
    body: Value,
}

/// Serves one canned `(status, body)` reply per connection, in order, then
/// hands back what it received.
fn serve(replies: Vec<(u16, String)>) -> (SocketAddr, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        replies
            .into_iter()
            .map(|(status, body)| {
                let (stream, _) = listener.accept().unwrap();
                answer(stream, status, &body)
            })
            .collect()
    });
    (addr, handle)
}

fn answer(stream: TcpStream, status: u16, reply: &str) -> Captured {
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0;
    let mut chunked = false;
    let mut authorization = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').unwrap();
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "content-length" => content_length = value.parse().unwrap(),
            "transfer-encoding" => chunked = value.eq_ignore_ascii_case("chunked"),
            "authorization" => authorization = Some(value.to_string()),
            _ => {}
        }
    }

    let body = if chunked {
        read_chunked(&mut reader)
    } else {
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).unwrap();
        body
    };

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
        reply.len()
    )
    .unwrap();
    stream.flush().unwrap();

    Captured {
        request_line: request_line.trim_end().to_string(),
        authorization,
        body: serde_json::from_slice(&body).unwrap(),
    }
}

fn read_chunked(reader: &mut impl BufRead) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size = String::new();
        reader.read_line(&mut size).unwrap();
        let size = usize::from_str_radix(size.trim(), 16).unwrap();
        let mut chunk = vec![0; size + 2];
        reader.read_exact(&mut chunk).unwrap();
        if size == 0 {
            return body;
        }
        body.extend_from_slice(&chunk[..size]);
    }
}

fn config(addr: SocketAddr) -> RunConfig {
    RunConfig::new("sekrit")
        .with_base_url(format!("http://{addr}/v1beta/openai/"))
        .with_seed(1)
}

fn reply(message: Value) -> String {
    json!({ "choices": [{ "index": 0, "message": message }] }).to_string()
}

#[test]
fn alien_rolls_dice_over_the_wire() {
    let tool_round = reply(json!({
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": { "name": "roll_dice", "arguments": "{}" }
        }]
    }));
    let final_round = reply(json!({ "role": "assistant", "content": "The aliens flee." }));
    let (addr, server) = serve(vec![(200, tool_round), (200, final_round)]);

    let config = config(addr);
    let mut service = ChatService::from_config(&config);
    let result = service
        .run_sync(&role::alien(), "Alien encounter", &config)
        .unwrap();

    assert_eq!(result.final_output, "The aliens flee.");
    assert_eq!(result.tools_invoked, vec!["roll_dice".to_string()]);

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.request_line, "POST /v1beta/openai/chat/completions HTTP/1.1");
        assert_eq!(request.authorization.as_deref(), Some("Bearer sekrit"));
        assert_eq!(request.body["model"], config.model.as_str());
    }

    let first = &requests[0].body;
    assert_eq!(first["messages"][0]["role"], "system");
    assert_eq!(first["messages"][1]["content"], "Alien encounter");
    let advertised: Vec<&str> = first["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["function"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(advertised, vec!["generate_space_event", "roll_dice"]);

    let followup = requests[1].body["messages"].as_array().unwrap();
    let tool_message = followup.last().unwrap();
    assert_eq!(tool_message["role"], "tool");
    assert_eq!(tool_message["tool_call_id"], "call_1");
    assert!(
        tool_message["content"]
            .as_str()
            .unwrap()
            .starts_with("🎲 Dice Roll: ")
    );
}

#[test]
fn rejected_key_reports_the_backend_message() {
    let body = json!([{
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT"
        }
    }])
    .to_string();
    let (addr, server) = serve(vec![(400, body)]);

    let config = config(addr);
    let err = ChatService::from_config(&config)
        .run_sync(&role::narrator(), "explore", &config)
        .unwrap_err();

    assert!(matches!(err, StepError::Invalid(_)));
    assert_eq!(
        err.to_string(),
        "invalid: backend answered HTTP 400: API key not valid. Please pass a valid API key."
    );
    server.join().unwrap();
}

#[test]
fn unavailable_backend_is_transient() {
    let (addr, server) = serve(vec![(503, "overloaded".to_string())]);

    let config = config(addr);
    let err = ChatService::from_config(&config)
        .run_sync(&role::reward(), "Give futuristic reward", &config)
        .unwrap_err();

    assert!(err.is_transient());
    assert_eq!(err.to_string(), "transient: backend answered HTTP 503: overloaded");
    server.join().unwrap();
}
