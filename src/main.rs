mod backend;
mod email;
mod extract;
mod geo;
mod ipc;
mod roster;
mod thai_time;

use std::io::{self, BufRead, Write};

use backend::{HttpBackend, RequestContext};

fn main() {
    // stdout carries the protocol; logs go to stderr.
    env_logger::init();

    let ctx = RequestContext {
        base_url: std::env::var("ATTENDANCED_API_URL").unwrap_or_default(),
        token: None,
    };
    let mut state = ipc::AppState::new(ctx, Box::new(HttpBackend::new()));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; ignore.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        log::debug!("dispatch {}", req.method);
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}
