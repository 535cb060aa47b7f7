use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::timer::FinishedSession;

/// One completed timer run, immutable once appended to the log.
/// Field names mirror the persisted document keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: u64,
    /// `%Y-%m-%d` of the session start.
    pub date: String,
    /// `%H:%M:%S` wall-clock start.
    pub start_time: String,
    /// `%H:%M:%S` wall-clock end.
    pub end_time: String,
    /// Target in effect when the session was started.
    pub target_minutes: u32,
    /// `HH:MM:SS` of effective elapsed time.
    pub elapsed_duration: String,
}

/// Render a duration as `HH:MM:SS`, second precision.
pub fn format_hms(d: Duration) -> String {
    let total = d.as_secs();
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Append-only history of completed sessions. `finalize` is the only
/// mutator and is called from timer transitions, never by external callers.
#[derive(Debug, Default)]
pub struct SessionLog {
    records: Vec<SessionRecord>,
    next_id: u64,
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild the log from persisted records. The id counter continues
    /// past the highest id ever written.
    pub fn from_records(records: Vec<SessionRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().map_or(1, |m| m + 1);
        Self { records, next_id }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a finished session as an immutable record, assigning the next
    /// id. Insertion order is chronological.
    pub fn finalize(&mut self, finished: FinishedSession) -> &SessionRecord {
        let record = SessionRecord {
            id: self.next_id,
            date: finished.started_wall.format("%Y-%m-%d").to_string(),
            start_time: finished.started_wall.format("%H:%M:%S").to_string(),
            end_time: finished.ended_wall.format("%H:%M:%S").to_string(),
            target_minutes: finished.target_minutes,
            elapsed_duration: format_hms(finished.elapsed),
        };
        self.next_id += 1;
        self.records.push(record);
        self.records.last().expect("record just pushed")
    }

    /// Write the full log as CSV, one row per record in log order.
    pub fn export_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record([
            "Id",
            "date",
            "start time",
            "end time",
            "target time",
            "elapsed time",
        ])?;
        for record in &self.records {
            out.write_record([
                record.id.to_string(),
                record.date.clone(),
                record.start_time.clone(),
                record.end_time.clone(),
                format!("{} min", record.target_minutes),
                record.elapsed_duration.clone(),
            ])?;
        }
        out.flush()?;
        Ok(())
    }
}
