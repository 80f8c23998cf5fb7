//! Attempt record CSV store
//!
//! One file collects every attempt. The header is written once, when the file
//! is created; each attempt then appends its summary, event and sample rows.
//! Every row has the full column set, with cells that do not apply to its
//! row type left empty. Downstream analysis depends on this column order.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use super::{ANONYMOUS_PARTICIPANT, AttemptMeta, AttemptMetrics, DeviceInfo};
use crate::error::RecordError;
use crate::trace::{SessionEvent, SessionRow};

/// Column names, in order
pub const COLUMNS: [&str; 30] = [
    "row_type",
    "attempt_id",
    "participant_id",
    "timestamp_iso",
    "device",
    "os",
    "screen_w",
    "screen_h",
    "shape",
    "eyes_free",
    "tolerance_band",
    "success",
    "duration_ms",
    "samples",
    "coverage_final",
    "path_length_pts",
    "onpath_time_ms",
    "offpath_time_ms",
    "vertices_hit",
    "resets",
    "back_actions",
    "event_type",
    "event_value",
    "t_rel_ms",
    "x",
    "y",
    "onPath",
    "distance",
    "vertexHit",
    "coverage",
];

/// Header line written once per store
pub const HEADER: &str = "row_type,attempt_id,participant_id,timestamp_iso,device,os,screen_w,screen_h,shape,eyes_free,tolerance_band,success,duration_ms,samples,coverage_final,path_length_pts,onpath_time_ms,offpath_time_ms,vertices_hit,resets,back_actions,event_type,event_value,t_rel_ms,x,y,onPath,distance,vertexHit,coverage\n";

/// Cells of the event block (event_type, event_value, t_rel_ms)
const EVENT_CELLS: usize = 3;
/// Cells of the sample block (x .. coverage)
const SAMPLE_CELLS: usize = 6;

/// A finalized attempt, ready to serialize
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Unix seconds at finalization; unique only under one-at-a-time finalization
    pub attempt_id: i64,
    pub timestamp: DateTime<Utc>,
    pub meta: AttemptMeta,
    pub device: DeviceInfo,
    pub metrics: AttemptMetrics,
    pub events: Vec<SessionEvent>,
    pub rows: Vec<SessionRow>,
}

impl AttemptRecord {
    /// All rows of this attempt (no header), newline-terminated
    pub fn to_csv(&self) -> String {
        let shared = self.attempt_cells();
        let mut out = String::new();

        let mut summary = row_start("summary", &shared);
        summary.extend(std::iter::repeat_n(String::new(), EVENT_CELLS + SAMPLE_CELLS));
        push_line(&mut out, &summary);

        for event in &self.events {
            let mut line = row_start("event", &shared);
            line.push(event.kind.as_str().to_string());
            line.push(escape(event.value.as_deref().unwrap_or("")));
            line.push(event.elapsed_ms.to_string());
            line.extend(std::iter::repeat_n(String::new(), SAMPLE_CELLS));
            push_line(&mut out, &line);
        }

        for row in &self.rows {
            let mut line = row_start("sample", &shared);
            line.push(String::new());
            line.push(String::new());
            line.push(row.elapsed_ms.to_string());
            line.push(real(row.x));
            line.push(real(row.y));
            line.push(row.on_path.to_string());
            line.push(real(row.distance));
            line.push(row.vertex_hit.to_string());
            line.push(real(row.coverage));
            push_line(&mut out, &line);
        }

        out
    }

    /// attempt_id .. back_actions
    fn attempt_cells(&self) -> Vec<String> {
        let meta = &self.meta;
        let m = &self.metrics;
        vec![
            self.attempt_id.to_string(),
            escape(meta.participant_id.as_deref().unwrap_or(ANONYMOUS_PARTICIPANT)),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            escape(&self.device.model),
            escape(&self.device.os),
            meta.screen_width.to_string(),
            meta.screen_height.to_string(),
            escape(meta.shape.title()),
            meta.eyes_free.to_string(),
            real(meta.tolerance_band),
            m.success.to_string(),
            m.duration_ms.to_string(),
            m.samples.to_string(),
            real(m.final_coverage),
            real(m.path_length),
            m.onpath_ms.to_string(),
            m.offpath_ms.to_string(),
            m.vertices_hit.to_string(),
            m.resets.to_string(),
            m.back_actions.to_string(),
        ]
    }
}

fn row_start(row_type: &str, shared: &[String]) -> Vec<String> {
    let mut cells = Vec::with_capacity(COLUMNS.len());
    cells.push(row_type.to_string());
    cells.extend_from_slice(shared);
    cells
}

fn push_line(out: &mut String, cells: &[String]) {
    debug_assert_eq!(cells.len(), COLUMNS.len());
    out.push_str(&cells.join(","));
    out.push('\n');
}

/// Fixed 4-decimal real formatting
pub fn real(v: f32) -> String {
    format!("{:.4}", v)
}

/// Quote a cell containing a delimiter, quote or newline
pub fn escape(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// The growing CSV file attempts are appended to
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Default store file name
    pub const FILE_NAME: &'static str = "traces_study.csv";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store named [`Self::FILE_NAME`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one attempt, creating the file (with header) if needed
    ///
    /// An existing file only ever has bytes appended, in one write of the
    /// whole attempt; a write that fails part-way can still leave a partial
    /// trailing row.
    pub fn append(&self, record: &AttemptRecord) -> Result<(), RecordError> {
        let payload = record.to_csv();
        if self.path.exists() {
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            file.write_all(payload.as_bytes())?;
            file.sync_data()?;
        } else {
            self.create(&format!("{HEADER}{payload}"))?;
            log::info!("Created record store {}", self.path.display());
        }
        Ok(())
    }

    /// Write a temporary sibling and rename it into place; a failed create
    /// leaves neither file behind
    fn create(&self, contents: &str) -> Result<(), RecordError> {
        let tmp = self.path.with_extension("csv.tmp");
        let created = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = created {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ShapeKind;
    use crate::trace::EventKind;

    fn record(participant: Option<&str>) -> AttemptRecord {
        let rows = vec![
            SessionRow {
                elapsed_ms: 0,
                x: 100.0,
                y: 100.0,
                on_path: true,
                distance: 0.0,
                vertex_hit: true,
                coverage: 0.0556,
            },
            SessionRow {
                elapsed_ms: 16,
                x: 110.5,
                y: 100.25,
                on_path: true,
                distance: 0.25,
                vertex_hit: true,
                coverage: 0.1,
            },
        ];
        let events = vec![
            SessionEvent::new(0, EventKind::Start),
            SessionEvent::with_value(0, EventKind::Vertex, "v=0"),
        ];
        AttemptRecord {
            attempt_id: 1_760_000_000,
            timestamp: DateTime::from_timestamp(1_760_000_000, 250_000_000).unwrap(),
            meta: AttemptMeta {
                shape: ShapeKind::Rectangle,
                eyes_free: true,
                tolerance_band: 16.0,
                screen_width: 390,
                screen_height: 844,
                participant_id: participant.map(str::to_string),
            },
            device: DeviceInfo::new("iPhone", "17.0"),
            metrics: AttemptMetrics::from_log(&rows, &events),
            events,
            rows,
        }
    }

    #[test]
    fn test_header_matches_columns() {
        assert_eq!(HEADER.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn test_rows_have_full_column_count() {
        let csv = record(None).to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1 + 2 + 2);
        for line in &lines {
            assert_eq!(line.split(',').count(), COLUMNS.len(), "{line}");
        }
        assert!(lines[0].starts_with("summary,1760000000,anon,2025-10-09T08:53:20.250Z,iPhone,17.0,390,844,Rectangle,true,16.0000,false,16,2,0.1000,10.5030,16,0,1,0,0,"));
        assert!(lines[1].starts_with("event,"));
        assert!(lines[2].ends_with(",vertex,v=0,0,,,,,,"));
        assert!(lines[4].ends_with(",,,16,110.5000,100.2500,true,0.2500,true,0.1000"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_participant_is_escaped() {
        let csv = record(Some("P1, pilot")).to_csv();
        assert!(csv.lines().next().unwrap().contains(",\"P1, pilot\","));
    }

    #[test]
    fn test_real_formatting() {
        assert_eq!(real(0.75), "0.7500");
        assert_eq!(real(12.0), "12.0000");
    }

    #[test]
    fn test_store_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::in_dir(dir.path());
        store.append(&record(None)).unwrap();
        store.append(&record(Some("P2"))).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let header_count = text.lines().filter(|l| l.starts_with("row_type,")).count();
        let summaries = text.lines().filter(|l| l.starts_with("summary,")).count();
        let events = text.lines().filter(|l| l.starts_with("event,")).count();
        let samples = text.lines().filter(|l| l.starts_with("sample,")).count();
        assert_eq!(header_count, 1);
        assert!(text.starts_with("row_type,"));
        assert_eq!((summaries, events, samples), (2, 4, 4));
        assert!(!dir.path().join("traces_study.csv.tmp").exists());
    }

    #[test]
    fn test_failed_create_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way of the store: the rename onto it fails
        let path = dir.path().join("traces_study.csv");
        fs::create_dir(&path).unwrap();
        let store = RecordStore::new(&path);

        let err = store.create(&record(None).to_csv());
        assert!(matches!(err, Err(RecordError::Io(_))));
        assert!(!dir.path().join("traces_study.csv.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_append_keeps_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::in_dir(dir.path());
        store.append(&record(None)).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();
        store.append(&record(None)).unwrap();
        let after = fs::read_to_string(store.path()).unwrap();
        assert!(after.starts_with(&before));
    }
}
