//! Test utilities and fixtures for snap-and-play tests.

use crate::recognition::CatalogMatch;

/// Spotify id of Thriller
pub const THRILLER_ID: &str = "2ANVost0y2y52ema1E9xAZ";

/// Model reply with the guess wrapped in chatter
pub const THRILLER_REPLY: &str = "Here is the album information:\n```json\n{\n  \"albumTitle\": \"Thriller\",\n  \"artist\": \"Michael Jackson\"\n}\n```";

/// A few bytes with a JPEG signature. Nothing decodes them.
pub fn fake_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00]
}

/// Catalog hit for Thriller without release date or track count
pub fn thriller_match() -> CatalogMatch {
    CatalogMatch {
        catalog_album_id: THRILLER_ID.to_string(),
        catalog_url: format!("https://open.spotify.com/album/{}", THRILLER_ID),
        release_date: None,
        track_count: None,
    }
}

/// One-shot HTTP server on localhost.
///
/// Answers the first connection with `status` and a JSON `body`, then hands
/// back the raw request text through the join handle.
pub fn serve_once(status: &str, body: &str) -> (String, std::thread::JoinHandle<String>) {
    use std::io::Write;
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(response.as_bytes()).unwrap();
        request
    });

    (format!("http://{}", addr), handle)
}

/// Read one request: headers, then `content-length` bytes of body
fn read_request(stream: &mut std::net::TcpStream) -> String {
    use std::io::Read;

    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
