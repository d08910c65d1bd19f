//! src/net/remote.rs
//!
//! Tiny line-based TCP control server for inspecting and driving the layout.
//!
//! Client threads never touch layout state. Each parsed command is sent to
//! the UI thread with a reply channel, and the UI thread answers it between
//! frames.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

/// How long a client waits for the UI thread before giving up on a reply.
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Longest accepted command line in bytes, newline included.
const MAX_LINE: u64 = 1024;

#[derive(Clone, Debug, PartialEq)]
pub enum RemoteCommand {
    Groups,
    Sizes { group: String },
    Resize {
        group: String,
        handle: usize,
        percent: f64,
    },
    Reset { group: String },
    Collapse { group: String, panel: String },
    Save,
}

/// A command plus the channel its single reply line goes back on.
#[derive(Debug)]
pub struct RemoteRequest {
    pub command: RemoteCommand,
    pub reply: Sender<String>,
}

/// Parsed client line.
#[derive(Debug, PartialEq)]
enum Line {
    Command(RemoteCommand),
    Quit,
}

/// Accept clients forever, one handler thread each.
pub fn remote_server(listener: TcpListener, requests: Sender<RemoteRequest>) {
    for stream in listener.incoming() {
        match stream {
            Ok(s) => {
                let tx = requests.clone();
                thread::spawn(move || handle_remote_client(s, tx));
            }
            Err(e) => {
                warn!(error = %e, "remote_server: accept error");
            }
        }
    }
}

/// Handle a single client; simple whitespace-split ASCII commands.
///
/// Commands:
/// - `groups`
/// - `sizes <group>`
/// - `resize <group> <handle> <percent>`
/// - `reset <group>`
/// - `collapse <group> <panel>`
/// - `save`
/// - `quit`
pub fn handle_remote_client(mut s: TcpStream, requests: Sender<RemoteRequest>) {
    let peer = s
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<peer?>".into());
    info!(%peer, "remote client connected");
    let reader = match s.try_clone() {
        Ok(r) => r,
        Err(e) => {
            warn!(%peer, error = %e, "could not clone client stream");
            return;
        }
    };
    let mut rdr = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let n = match (&mut rdr).take(MAX_LINE).read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        if n as u64 == MAX_LINE && !line.ends_with('\n') {
            warn!(%peer, "remote line too long");
            if s.write_all(b"ERR line too long\n").is_err() {
                break;
            }
            // drop the rest of the line without buffering it
            match rdr.skip_until(b'\n') {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        debug!(%peer, command = raw, "remote command");

        let reply = match parse_line(raw) {
            Ok(Line::Quit) => {
                let _ = s.write_all(b"OK bye\n");
                break;
            }
            Ok(Line::Command(command)) => dispatch(&requests, command),
            Err(msg) => format!("ERR {msg}"),
        };
        if s.write_all(reply.as_bytes()).is_err() || s.write_all(b"\n").is_err() {
            break;
        }
    }

    let _ = s.shutdown(Shutdown::Both);
    info!(%peer, "remote client disconnected");
}

/// Hand a command to the UI thread and wait for its answer.
fn dispatch(requests: &Sender<RemoteRequest>, command: RemoteCommand) -> String {
    let (reply_tx, reply_rx) = mpsc::channel();
    let request = RemoteRequest {
        command,
        reply: reply_tx,
    };
    if requests.send(request).is_err() {
        return "ERR shutting down".to_string();
    }
    reply_rx
        .recv_timeout(REPLY_TIMEOUT)
        .unwrap_or_else(|_| "ERR timeout".to_string())
}

fn parse_line(raw: &str) -> Result<Line, String> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    let Some(verb) = parts.first() else {
        return Err("empty".to_string());
    };

    let command = match (verb.to_lowercase().as_str(), parts.len()) {
        ("quit", 1) => return Ok(Line::Quit),
        ("groups", 1) => RemoteCommand::Groups,
        ("save", 1) => RemoteCommand::Save,
        ("sizes", 2) => RemoteCommand::Sizes {
            group: parts[1].to_string(),
        },
        ("reset", 2) => RemoteCommand::Reset {
            group: parts[1].to_string(),
        },
        ("collapse", 3) => RemoteCommand::Collapse {
            group: parts[1].to_string(),
            panel: parts[2].to_string(),
        },
        ("resize", 4) => {
            let handle = parts[2].parse::<usize>().map_err(|_| "handle".to_string())?;
            let percent = parts[3]
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| "percent".to_string())?;
            RemoteCommand::Resize {
                group: parts[1].to_string(),
                handle,
                percent,
            }
        }
        _ => return Err(format!("unknown {}", parts.join(" "))),
    };
    Ok(Line::Command(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(parse_line("groups"), Ok(Line::Command(RemoteCommand::Groups)));
        assert_eq!(parse_line("SAVE"), Ok(Line::Command(RemoteCommand::Save)));
        assert_eq!(parse_line("quit"), Ok(Line::Quit));
        assert_eq!(
            parse_line("sizes root"),
            Ok(Line::Command(RemoteCommand::Sizes {
                group: "root".into()
            }))
        );
        assert_eq!(
            parse_line("reset main"),
            Ok(Line::Command(RemoteCommand::Reset {
                group: "main".into()
            }))
        );
        assert_eq!(
            parse_line("collapse root inspector"),
            Ok(Line::Command(RemoteCommand::Collapse {
                group: "root".into(),
                panel: "inspector".into(),
            }))
        );
        assert_eq!(
            parse_line("resize  root 1   42.5"),
            Ok(Line::Command(RemoteCommand::Resize {
                group: "root".into(),
                handle: 1,
                percent: 42.5,
            }))
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(parse_line("resize root x 10"), Err("handle".to_string()));
        assert_eq!(parse_line("resize root 0 NaN"), Err("percent".to_string()));
        assert_eq!(parse_line("sizes"), Err("unknown sizes".to_string()));
        assert_eq!(parse_line("fly away"), Err("unknown fly away".to_string()));
    }

    #[test]
    fn client_round_trip_through_channel() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel::<RemoteRequest>();
        thread::spawn(move || remote_server(listener, tx));

        // stand-in for the UI thread
        thread::spawn(move || {
            for req in rx {
                let answer = match req.command {
                    RemoteCommand::Groups => "OK root".to_string(),
                    other => format!("ERR {other:?}"),
                };
                let _ = req.reply.send(answer);
            }
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"groups\nbogus\nquit\n").unwrap();
        let mut lines = BufReader::new(client).lines();
        assert_eq!(lines.next().unwrap().unwrap(), "OK root");
        assert_eq!(lines.next().unwrap().unwrap(), "ERR unknown bogus");
        assert_eq!(lines.next().unwrap().unwrap(), "OK bye");
    }

    #[test]
    fn overlong_line_is_refused_and_skipped() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel::<RemoteRequest>();
        thread::spawn(move || remote_server(listener, tx));
        thread::spawn(move || {
            for req in rx {
                let _ = req.reply.send("OK root".to_string());
            }
        });

        let mut client = TcpStream::connect(addr).unwrap();
        let mut payload = vec![b'x'; 3 * MAX_LINE as usize];
        payload.extend_from_slice(b"\ngroups\nquit\n");
        client.write_all(&payload).unwrap();

        let mut lines = BufReader::new(client).lines();
        assert_eq!(lines.next().unwrap().unwrap(), "ERR line too long");
        assert_eq!(lines.next().unwrap().unwrap(), "OK root");
        assert_eq!(lines.next().unwrap().unwrap(), "OK bye");
    }
}
