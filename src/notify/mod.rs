//! Notification sinks for newly detected grades.
//!
//! Provides trait-based delivery: stdout (human-readable) and ntfy push
//! notifications (HTTP POST, `http` feature).

use crate::config::NotifyConfig;
use crate::diff::NewGrade;
use crate::error::Result;
use std::io::Write;

/// Trait for receiving new-grade events.
pub trait NotifySink {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Deliver one new grade.
    fn notify(&mut self, grade: &NewGrade) -> Result<()>;

    /// Deliver every grade in order, stopping at the first hard failure.
    fn notify_all(&mut self, grades: &[NewGrade]) -> Result<usize> {
        for grade in grades {
            self.notify(grade)?;
        }
        Ok(grades.len())
    }
}

// ============================================================================
// Stdout sink
// ============================================================================

/// Writes `[HH:MM:SS] <title>: <details>` lines.
pub struct StdoutSink {
    writer: Box<dyn Write + Send>,
}

impl StdoutSink {
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    #[must_use]
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifySink for StdoutSink {
    fn name(&self) -> &'static str {
        "stdout"
    }

    fn notify(&mut self, grade: &NewGrade) -> Result<()> {
        let ts = chrono::Local::now().format("%H:%M:%S");
        writeln!(self.writer, "[{ts}] {}: {}", grade.title, grade.details)?;
        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// ntfy sink (feature-gated)
// ============================================================================

/// Publishes each grade to an ntfy topic.
///
/// Uses ntfy's JSON publishing endpoint so titles with accents survive
/// untouched. Delivery failures are logged and skipped.
#[cfg(feature = "http")]
pub struct NtfySink {
    server: String,
    topic: String,
    config: NotifyConfig,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl NtfySink {
    pub fn new(topic: impl Into<String>, config: &NotifyConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                crate::error::GradesError::notify(format!("Failed to create HTTP client: {e}"))
            })?;
        Ok(Self {
            server: config.server.trim_end_matches('/').to_string(),
            topic: topic.into(),
            config: config.clone(),
            client,
        })
    }

    fn payload(&self, grade: &NewGrade) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "topic": self.topic,
            "title": grade.title,
            "message": grade.details,
            "priority": self.config.priority,
            "tags": self.config.tags,
        });
        if let Some(click) = &self.config.click {
            payload["click"] = serde_json::Value::String(click.clone());
        }
        payload
    }
}

#[cfg(feature = "http")]
impl NotifySink for NtfySink {
    fn name(&self) -> &'static str {
        "ntfy"
    }

    fn notify(&mut self, grade: &NewGrade) -> Result<()> {
        let resp = self.client.post(&self.server).json(&self.payload(grade)).send();
        match resp {
            Ok(r) if r.status().is_success() => {
                tracing::debug!("Published '{}' to ntfy topic {}", grade.title, self.topic);
                Ok(())
            }
            Ok(r) => {
                tracing::warn!("ntfy returned status {} for '{}'", r.status(), grade.title);
                Ok(()) // non-fatal
            }
            Err(e) => {
                tracing::warn!("ntfy delivery failed for '{}': {e}", grade.title);
                Ok(()) // non-fatal
            }
        }
    }
}

// ============================================================================
// Sink builder
// ============================================================================

/// Build notification sinks: always stdout, plus ntfy when a topic is set.
pub fn build_sinks(config: &NotifyConfig, quiet: bool) -> Result<Vec<Box<dyn NotifySink>>> {
    let mut sinks: Vec<Box<dyn NotifySink>> = Vec::new();

    if !quiet {
        sinks.push(Box::new(StdoutSink::new()));
    }

    match &config.topic {
        #[cfg(feature = "http")]
        Some(topic) => sinks.push(Box::new(NtfySink::new(topic.clone(), config)?)),
        #[cfg(not(feature = "http"))]
        Some(topic) => {
            tracing::warn!("Built without the http feature; not publishing to ntfy topic {topic}");
        }
        None => {}
    }

    Ok(sinks)
}
