//! ntfy delivery tests against a local `TcpListener` stub.

#![cfg(feature = "http")]

use grades_dashboard::config::NotifyConfig;
use grades_dashboard::diff::NewGrade;
use grades_dashboard::notify::{NotifySink, NtfySink};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::time::Duration;

fn grade(title: &str, details: &str) -> NewGrade {
    NewGrade {
        title: title.to_string(),
        details: details.to_string(),
        course: "Algèbre".to_string(),
        grade_type: "Examen".to_string(),
        value: "15,5".to_string(),
        coef: "50".to_string(),
    }
}

/// One request as the stub saw it.
struct Received {
    request_line: String,
    body: serde_json::Value,
}

/// Answer every request with `status` and forward what was posted.
/// Returns the server URL.
fn serve(status: u16) -> (String, mpsc::Receiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            let header_end = loop {
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break raw.len(),
                    Ok(n) => raw.extend_from_slice(&buf[..n]),
                }
            };

            let head = String::from_utf8_lossy(&raw[..header_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            while raw.len() < header_end + content_length {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => raw.extend_from_slice(&buf[..n]),
                }
            }

            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}"
            );
            let _ = stream.write_all(response.as_bytes());

            let _ = tx.send(Received {
                request_line: head.lines().next().unwrap_or_default().to_string(),
                body: serde_json::from_slice(&raw[header_end..]).unwrap_or_default(),
            });
        }
    });

    (format!("http://{addr}/"), rx)
}

fn sink(server: String) -> NtfySink {
    let config = NotifyConfig {
        server,
        timeout_secs: 5,
        click: Some("https://school.example/grades".to_string()),
        ..NotifyConfig::default()
    };
    NtfySink::new("my-grades", &config).unwrap()
}

fn next(rx: &mpsc::Receiver<Received>) -> Received {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

#[test]
fn posts_each_grade_as_json_to_the_server() {
    let (server, rx) = serve(200);
    let mut sink = sink(server);

    let sent = sink
        .notify_all(&[
            grade("Algèbre - Examen", "15,5 - 50%"),
            grade("Probabilités - Examen", "18 - 100%"),
        ])
        .unwrap();
    assert_eq!(sent, 2);

    let first = next(&rx);
    assert!(first.request_line.starts_with("POST / "));
    assert_eq!(first.body["topic"], "my-grades");
    assert_eq!(first.body["title"], "Algèbre - Examen");
    assert_eq!(first.body["message"], "15,5 - 50%");
    assert_eq!(first.body["priority"], 5);
    assert_eq!(first.body["tags"][0], "face_in_clouds");
    assert_eq!(first.body["click"], "https://school.example/grades");

    assert_eq!(next(&rx).body["title"], "Probabilités - Examen");
}

#[test]
fn server_error_is_not_fatal() {
    let (server, rx) = serve(500);
    let mut sink = sink(server);

    assert!(sink.notify(&grade("Algèbre - Examen", "15,5 - 50%")).is_ok());
    // the request still went out
    assert_eq!(next(&rx).body["title"], "Algèbre - Examen");
    assert_eq!(
        sink.notify_all(&[grade("A - Examen", "1 - 100%"), grade("B - Examen", "2 - 100%")])
            .unwrap(),
        2
    );
}

#[test]
fn refused_connection_is_not_fatal() {
    // Bind then drop to get a port nobody listens on
    let addr = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut sink = sink(format!("http://{addr}"));

    assert!(sink.notify(&grade("Algèbre - Examen", "15,5 - 50%")).is_ok());
}
