use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How long `/slow` waits before answering.
pub(super) const SLOW_RESPONSE_DELAY: Duration = Duration::from_millis(1500);

pub(super) struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawns a small HTTP/1.1 server on 127.0.0.1 serving a page that references
/// a stylesheet, a script, an image (twice) and one resource on `localhost`.
pub(super) fn spawn_site() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let port = addr.port();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream, port));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Returns a local port with nothing listening on it.
pub(super) fn closed_port() -> Result<u16, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind failed: {}", err))?;
    let port = listener
        .local_addr()
        .map_err(|err| format!("addr failed: {}", err))?
        .port();
    drop(listener);
    Ok(port)
}

pub(super) fn site_page(port: u16) -> String {
    format!(
        r#"<!doctype html>
<html><head>
<link rel="stylesheet" href="/style.css">
<link rel="icon" href="/favicon.ico">
<script src="/app.js"></script>
<script>var inline = '<img src="/never.png">';</script>
</head><body>
<!-- <img src="/commented.png"> -->
<img src="/logo.png"><img src="logo.png">
<img src="http://localhost:{port}/remote.png">
</body></html>"#
    )
}

fn handle_client(mut stream: TcpStream, port: u16) {
    drop(stream.set_nonblocking(false));
    let mut buffer = [0u8; 4096];
    let read = match stream.read(&mut buffer) {
        Ok(0) | Err(_) => return,
        Ok(read) => read,
    };
    let request = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default()).into_owned();
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_owned();

    let (status, content_type, body, extra) = match path.as_str() {
        "/" | "/index.html" => ("200 OK", "text/html; charset=utf-8", site_page(port), String::new()),
        "/redirect" => ("302 Found", "text/plain", String::new(), "Location: /\r\n".to_owned()),
        "/plain" => ("200 OK", "text/plain", "OK".to_owned(), String::new()),
        "/slow" => {
            thread::sleep(SLOW_RESPONSE_DELAY);
            ("200 OK", "text/plain", "late".to_owned(), String::new())
        }
        other if other.ends_with(".css") => ("200 OK", "text/css", "body{}".to_owned(), String::new()),
        other if other.ends_with(".js") => (
            "200 OK",
            "application/javascript",
            "void 0;".to_owned(),
            String::new(),
        ),
        _ => ("200 OK", "image/png", "PNG".to_owned(), String::new()),
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n{extra}Connection: close\r\n\r\n{body}",
        body.len()
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}
