use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::Result;
use crate::util::output;

/// How long a connected client gets to send its request before the connection is dropped.
pub const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Answers every request on `port` with the current contents of `path`.
pub fn serve_blocking(path: PathBuf, port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(bind_and_serve(path, port))
}

async fn bind_and_serve(path: PathBuf, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    output::status("serve", &format!("http://localhost:{port}"));
    serve_with_listener(listener, path).await
}

pub async fn serve_with_listener(listener: TcpListener, path: PathBuf) -> Result<()> {
    serve_with_timeout(listener, path, REQUEST_READ_TIMEOUT).await
}

pub async fn serve_with_timeout(
    listener: TcpListener,
    path: PathBuf,
    read_timeout: Duration,
) -> Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        let path = path.clone();
        tokio::spawn(async move {
            if let Err(err) = respond(stream, &path, read_timeout).await {
                output::warn(&format!("request failed: {err}"));
            }
        });
    }
}

async fn respond(mut stream: TcpStream, path: &Path, read_timeout: Duration) -> io::Result<()> {
    // The request itself is irrelevant; every path gets the page.
    let mut request = [0u8; 4096];
    tokio::time::timeout(read_timeout, stream.read(&mut request))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "client sent no request in time"))??;

    let (status, content_type, body) = match tokio::fs::read(path).await {
        Ok(body) => ("200 OK", "text/html; charset=utf-8", body),
        Err(_) => ("404 Not Found", "text/plain", b"not found\n".to_vec()),
    };
    let header = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(header.as_bytes()).await?;
    stream.write_all(&body).await?;
    stream.shutdown().await
}
