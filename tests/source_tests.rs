//! Grade source integration tests.
//!
//! File sources are exercised against fixtures and temp files; the API
//! client talks to a tiny `TcpListener` stub serving canned responses.

use grades_dashboard::error::GradesError;
use grades_dashboard::source::{load_years, FileSource, GradeSource};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

// ============================================================================
// File source
// ============================================================================

mod file_source {
    use super::*;

    #[test]
    fn describes_itself_by_path() {
        let source = FileSource::new(fixture_path("grades.json"));
        assert!(source.describe().ends_with("grades.json"));
    }

    #[test]
    fn missing_file_message() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.json");
        let err = FileSource::new(&path).load().unwrap_err();

        assert!(matches!(err, GradesError::Source { .. }));
        assert!(err.user_message().starts_with("Grades file not found"));
    }

    #[test]
    fn invalid_json_message() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "[{\"year_name\": ").unwrap();

        let err = load_years(&path).unwrap_err();
        assert!(err.user_message().starts_with("Invalid JSON in grades file"));
    }

    #[test]
    fn non_list_payload_message() {
        let err = load_years(&fixture_path("not_a_list.json")).unwrap_err();
        assert_eq!(
            err.user_message(),
            "Unexpected grades payload shape: expected top-level list"
        );
    }

    #[test]
    fn empty_list_loads_nothing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();

        let set = FileSource::new(&path).load().unwrap();
        assert!(set.rows.is_empty());
        assert!(set.meta.filters.years.is_empty());
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sparse.json");
        std::fs::write(
            &path,
            r#"[{"semesters": [{"semester_modules": [{"module_courses": [{"course_grades_type": [{}]}]}]}]}]"#,
        )
        .unwrap();

        let set = FileSource::new(&path).load().unwrap();
        assert_eq!(set.rows.len(), 1);
        assert!(set.rows[0].module.is_empty());
        // Empty names never reach the selectors
        assert!(set.meta.filters.modules.is_empty());
    }
}

// ============================================================================
// API client
// ============================================================================

#[cfg(feature = "http")]
mod api_client {
    use super::*;
    use grades_dashboard::source::{ApiClient, ApiClientConfig};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    const GRADES_BODY: &str = r#"{
        "years": [],
        "flattened": [
            {"year": "2024-2025", "semester": "S1", "module": "Maths", "course": "Algèbre",
             "grade_type": "Examen", "grade_value": "15,5", "grade_numeric": 15.5,
             "grade_coef": "50", "type_coefficient": 60, "status": "numeric"},
            {"year": "2024-2025", "semester": "S1", "module": "Maths", "course": "Algèbre",
             "grade_type": "TP", "grade_value": null, "grade_numeric": null,
             "grade_coef": null, "type_coefficient": 40, "status": "pending"}
        ]
    }"#;

    const META_BODY: &str = r#"{
        "last_updated": "2025-01-15T10:30:00+00:00",
        "filters": {"years": ["2024-2025"], "semesters": ["S1"], "modules": ["Maths"]}
    }"#;

    /// Serve canned `(status, body)` responses for `/api/grades` and
    /// `/api/meta` until the test process exits. Returns the base URL.
    fn serve(grades: (u16, &'static str), meta: (u16, &'static str)) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&request);
                let (status, body) = if request.starts_with("GET /api/grades") {
                    grades
                } else if request.starts_with("GET /api/meta") {
                    meta
                } else {
                    (404, "{}")
                };
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}")
    }

    fn client(api_base: String) -> ApiClient {
        ApiClient::new(ApiClientConfig {
            api_base,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn loads_rows_and_meta() {
        let base = serve((200, GRADES_BODY), (200, META_BODY));
        let set = client(base).load().unwrap();

        assert_eq!(set.rows.len(), 2);
        assert_eq!(set.rows[0].grade_numeric, Some(15.5));
        assert_eq!(set.meta.filters.modules, vec!["Maths"]);
        assert_eq!(
            set.meta.last_updated.as_deref(),
            Some("2025-01-15T10:30:00+00:00")
        );
    }

    #[test]
    fn grades_status_failure_is_reported_verbatim() {
        let base = serve((500, "{}"), (200, META_BODY));
        let err = client(base).load().unwrap_err();
        assert_eq!(err.user_message(), "Grades API failed: 500");
    }

    #[test]
    fn meta_status_failure_fails_the_whole_load() {
        let base = serve((200, GRADES_BODY), (503, "{}"));
        let err = client(base).load().unwrap_err();
        assert_eq!(err.user_message(), "Meta API failed: 503");
    }

    #[test]
    fn unreachable_backend_is_an_error() {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let err = client(format!("http://{addr}")).load().unwrap_err();
        assert!(matches!(err, GradesError::Fetch { .. }));
    }
}
