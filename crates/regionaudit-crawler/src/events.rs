//! Audit event stream: typed events internally, the line protocol at the
//! process boundary.
//!
//! Inside the worker, events flow over a bounded channel from the
//! coordinator to whoever drains them. The line-oriented text protocol
//! (`[PROGRESS]`, `[RESULT_JSON]`, `[!]`, and the terminal `- Report:` /
//! `- Images:` / `- Schema:` lines) exists only where the stream crosses
//! the process boundary; this module renders and parses both directions of
//! that contract.

use std::sync::OnceLock;

use regex::Regex;
use tokio::sync::mpsc;

use regionaudit_core::RegionArtifacts;

/// One event emitted during an audit run.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    /// Free-text status; may embed a `<i/N>` progress marker.
    Progress { message: String },
    /// Non-fatal warning.
    Warning { message: String },
    /// One completed region's artifact set.
    Region(RegionArtifacts),
    /// Terminal artifact locations, emitted once after the report is written.
    ReportPaths {
        report: String,
        images: String,
        schema: String,
    },
}

impl AuditEvent {
    /// Renders this event as protocol lines. Every variant is one line
    /// except `ReportPaths`, which is the three terminal path lines.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            AuditEvent::Progress { message } => vec![format!("[PROGRESS] {message}")],
            AuditEvent::Warning { message } => vec![format!("[!] {message}")],
            AuditEvent::Region(artifacts) => {
                let json = serde_json::to_string(artifacts)
                    .unwrap_or_else(|_| "{}".to_owned());
                vec![format!("[RESULT_JSON] {json}")]
            }
            AuditEvent::ReportPaths {
                report,
                images,
                schema,
            } => vec![
                format!("- Report: {report}"),
                format!("- Images: {images}"),
                format!("- Schema: {schema}"),
            ],
        }
    }
}

/// Bounded sending half of the audit event channel.
///
/// Emission is best-effort: a dropped receiver never blocks or fails the
/// crawl, it only loses progress reporting.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<AuditEvent>,
}

impl EventSink {
    /// Creates a bounded event channel.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AuditEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub async fn send(&self, event: AuditEvent) {
        if self.tx.send(event).await.is_err() {
            tracing::debug!("event receiver dropped — discarding audit event");
        }
    }

    pub async fn progress(&self, message: impl Into<String>) {
        self.send(AuditEvent::Progress {
            message: message.into(),
        })
        .await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        self.send(AuditEvent::Warning {
            message: message.into(),
        })
        .await;
    }
}

/// A `<i/N>` marker parsed out of a progress message.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMarker {
    pub index: u32,
    pub total: u32,
}

impl ProgressMarker {
    /// Fractional progress in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.index) / f64::from(self.total)
        }
    }

    /// Human label, e.g. `"Region 2 of 5"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Region {} of {}", self.index, self.total)
    }
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(\d+)/(\d+)>").expect("valid marker regex"))
}

/// Strips the `<i/N>` marker from a progress message.
///
/// Returns the cleaned message and the parsed marker, if one was embedded.
#[must_use]
pub fn parse_progress(message: &str) -> (String, Option<ProgressMarker>) {
    let re = marker_regex();
    let Some(caps) = re.captures(message) else {
        return (message.trim().to_owned(), None);
    };
    let marker = match (caps[1].parse(), caps[2].parse()) {
        (Ok(index), Ok(total)) => Some(ProgressMarker { index, total }),
        _ => None,
    };
    let cleaned = re.replace(message, "").trim().to_owned();
    (cleaned, marker)
}

/// Terminal artifact locations recovered from a completed worker's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportLocations {
    pub report: Option<String>,
    pub images: Option<String>,
    pub schema: Option<String>,
}

/// Parses the terminal `- Report:` / `- Images:` / `- Schema:` lines out of
/// an output transcript. Matching is by prefix, not line position, so
/// interleaved progress lines are harmless.
#[must_use]
pub fn parse_report_locations(output: &str) -> ReportLocations {
    let mut locations = ReportLocations::default();
    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("- Report:") {
            locations.report = Some(rest.trim().to_owned());
        } else if let Some(rest) = line.strip_prefix("- Images:") {
            locations.images = Some(rest.trim().to_owned());
        } else if let Some(rest) = line.strip_prefix("- Schema:") {
            locations.schema = Some(rest.trim().to_owned());
        }
    }
    locations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_rendering() {
        let event = AuditEvent::Progress {
            message: "<1/3> [default] Navigating...".to_owned(),
        };
        assert_eq!(
            event.to_lines(),
            vec!["[PROGRESS] <1/3> [default] Navigating...".to_owned()]
        );
    }

    #[test]
    fn warning_line_rendering() {
        let event = AuditEvent::Warning {
            message: "Screenshot failed: blank capture".to_owned(),
        };
        assert_eq!(
            event.to_lines(),
            vec!["[!] Screenshot failed: blank capture".to_owned()]
        );
    }

    #[test]
    fn region_line_round_trips_through_json() {
        let artifacts = RegionArtifacts {
            region_id: "north".to_owned(),
            final_url: "https://example.com/de/tv?region_id=north".to_owned(),
            website_png_rel: "images/region_north__website_1.png".to_owned(),
            schema_path_abs: "/outs/out_1/schema/region_north__schema_1.json".to_owned(),
            schema_json_rel: "schema/region_north__schema_1.json".to_owned(),
        };
        let lines = AuditEvent::Region(artifacts).to_lines();
        assert_eq!(lines.len(), 1);
        let json = lines[0].strip_prefix("[RESULT_JSON] ").unwrap();
        let parsed: RegionArtifacts = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.region_id, "north");
    }

    #[test]
    fn report_paths_render_three_lines() {
        let event = AuditEvent::ReportPaths {
            report: "/outs/out_1/report_1.html".to_owned(),
            images: "/outs/out_1/images".to_owned(),
            schema: "/outs/out_1/schema".to_owned(),
        };
        let lines = event.to_lines();
        assert_eq!(lines[0], "- Report: /outs/out_1/report_1.html");
        assert_eq!(lines[1], "- Images: /outs/out_1/images");
        assert_eq!(lines[2], "- Schema: /outs/out_1/schema");
    }

    #[test]
    fn parse_progress_extracts_marker() {
        let (cleaned, marker) = parse_progress("<2/5> [north] Waiting for content...");
        let marker = marker.unwrap();
        assert_eq!(cleaned, "[north] Waiting for content...");
        assert_eq!(marker, ProgressMarker { index: 2, total: 5 });
        assert!((marker.fraction() - 0.4).abs() < f64::EPSILON);
        assert_eq!(marker.label(), "Region 2 of 5");
    }

    #[test]
    fn parse_progress_without_marker() {
        let (cleaned, marker) = parse_progress("Generating HTML Report...");
        assert_eq!(cleaned, "Generating HTML Report...");
        assert!(marker.is_none());
    }

    #[test]
    fn parse_report_locations_by_prefix_not_position() {
        let output = "\
[PROGRESS] <3/3> [south] Taking screenshot...
- Schema: /outs/out_1/schema
noise line
- Report: /outs/out_1/report_1.html
- Images: /outs/out_1/images
";
        let locations = parse_report_locations(output);
        assert_eq!(locations.report.as_deref(), Some("/outs/out_1/report_1.html"));
        assert_eq!(locations.images.as_deref(), Some("/outs/out_1/images"));
        assert_eq!(locations.schema.as_deref(), Some("/outs/out_1/schema"));
    }

    #[tokio::test]
    async fn sink_discards_when_receiver_dropped() {
        let (sink, rx) = EventSink::channel(4);
        drop(rx);
        // Must not hang or panic.
        sink.progress("late message").await;
    }

    #[tokio::test]
    async fn sink_delivers_in_order() {
        let (sink, mut rx) = EventSink::channel(4);
        sink.progress("first").await;
        sink.warn("second").await;
        match rx.recv().await.unwrap() {
            AuditEvent::Progress { message } => assert_eq!(message, "first"),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            AuditEvent::Warning { message } => assert_eq!(message, "second"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
