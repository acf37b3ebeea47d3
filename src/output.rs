use crate::config::Config;
use crate::session::SessionInfo;
use crate::trial::TrialResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Append-only destination for completed trials. One writer, no revisions:
/// a result is appended the moment its trial completes and never touched
/// again.
pub trait ResultSink {
    fn append(&mut self, result: &TrialResult) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Wide-text sink: one CSV row per completed trial. The header is written
/// when the sink is created; every session gets a fresh file under its own
/// filename stem.
#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<fs::File>,
}

impl CsvSink {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path.as_ref()).map_err(io_error)?;
        writer
            .write_record([
                "block",
                "trial",
                "stim_onset",
                "trial_duration",
                "condition",
                "rt",
                "response",
                "correct",
            ])
            .map_err(io_error)?;
        Ok(Self { writer })
    }
}

fn io_error(e: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

impl ResultSink for CsvSink {
    fn append(&mut self, result: &TrialResult) -> io::Result<()> {
        // Absent response/rt serialize as empty fields, correctness as 1/0.
        self.writer
            .write_record([
                result.block_index.to_string(),
                result.trial_index.to_string(),
                format!("{:.1}", result.stimulus_onset_ms),
                format!("{:.1}", result.trial_duration_ms),
                result.condition.to_string(),
                result
                    .reaction_time_ms
                    .map(|rt| format!("{:.1}", rt))
                    .unwrap_or_default(),
                result.response.map(|r| r.to_string()).unwrap_or_default(),
                if result.is_correct { "1" } else { "0" }.to_string(),
            ])
            .map_err(io_error)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// In-process sink for headless tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub results: Vec<TrialResult>,
    pub flushes: usize,
}

impl ResultSink for MemorySink {
    fn append(&mut self, result: &TrialResult) -> io::Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Full session state, serialized beside the CSV for audit and recovery.
/// Not read back by this program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionArtifact {
    pub info: SessionInfo,
    pub config: Config,
    pub results: Vec<TrialResult>,
    pub aborted: bool,
    pub saved_at: DateTime<Local>,
}

impl SessionArtifact {
    pub fn new(info: SessionInfo, config: Config, results: Vec<TrialResult>, aborted: bool) -> Self {
        Self {
            info,
            config,
            results,
            aborted,
            saved_at: Local::now(),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)
    }
}

/// Flushes the sink and writes the artifact. Runs on every exit path,
/// including a session loop that returned an error, so whatever was
/// collected before the failure still reaches disk.
pub fn finalize_session<P: AsRef<Path>>(
    sink: &mut dyn ResultSink,
    artifact: &SessionArtifact,
    json_path: P,
) -> io::Result<()> {
    sink.flush()?;
    artifact.save(json_path)
}

/// `{data_dir}/{stem}.csv` and `{data_dir}/{stem}.json`.
pub fn session_paths(data_dir: &Path, stem: &str) -> (PathBuf, PathBuf) {
    (
        data_dir.join(format!("{}.csv", stem)),
        data_dir.join(format!("{}.json", stem)),
    )
}
