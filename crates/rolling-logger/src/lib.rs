//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to `<log_dir>/<app>.log`.
//! When the active file grows past its size limit it is archived under a
//! timestamped name and a fresh file is started; only the newest archives are
//! kept, so the files on disk behave like a circular buffer. The newest lines
//! are also mirrored into an in-memory ring buffer, see [`recent_lines`].
//!
//! Records emitted through the `log` facade are bridged into the subscriber.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Size at which the active log file is archived
const MAX_FILE_BYTES: u64 = 1024 * 1024;
/// Number of archived files kept next to the active one
const MAX_ARCHIVES: usize = 5;
/// Lines kept in memory for `recent_lines`
const RECENT_CAPACITY: usize = 500;

type SharedSink = Arc<Mutex<Sink>>;

static SINK: OnceLock<SharedSink> = OnceLock::new();

/// Size-limited log file with timestamped archives
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    max_bytes: u64,
    max_archives: usize,
    file: Option<File>,
    written: u64,
    rotations: u32,
}

impl RollingFile {
    /// Open (or continue) `<dir>/<app_name>.log`, creating `dir` if needed
    pub fn open(dir: &Path, app_name: &str, max_bytes: u64, max_archives: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let mut rolling = Self {
            dir: dir.to_path_buf(),
            app_name: app_name.to_string(),
            max_bytes,
            max_archives,
            file: None,
            written: 0,
            rotations: 0,
        };
        let file = rolling.open_active()?;
        rolling.written = file.metadata()?.len();
        rolling.file = Some(file);
        Ok(rolling)
    }

    /// Path of the file currently being written
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    /// Append one formatted record, rotating first if it would overflow.
    /// A record larger than the limit still lands in a fresh file.
    pub fn write_record(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + bytes.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        if self.file.is_none() {
            self.file = Some(self.open_active()?);
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(bytes)?;
        }
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Archived files, oldest first
    pub fn archives(&self) -> io::Result<Vec<PathBuf>> {
        let prefix = format!("{}-", self.app_name);
        let mut archives = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_archive = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix) && n.ends_with(".log"))
                .unwrap_or(false);
            if is_archive {
                archives.push(path);
            }
        }
        // Timestamps are fixed width, so name order is age order
        archives.sort();
        Ok(archives)
    }

    fn open_active(&self) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(self.path())
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        self.rotations += 1;
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
        let archive = self
            .dir
            .join(format!("{}-{}-{:04}.log", self.app_name, stamp, self.rotations));
        fs::rename(self.path(), &archive)?;
        self.prune()?;
        self.file = Some(self.open_active()?);
        self.written = 0;
        Ok(())
    }

    fn prune(&self) -> io::Result<()> {
        let archives = self.archives()?;
        let excess = archives.len().saturating_sub(self.max_archives);
        for old in archives.into_iter().take(excess) {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

/// Ring buffer of the newest log lines
pub struct RecentLines {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RecentLines {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Split a formatted record into lines, evicting the oldest past capacity
    pub fn push(&mut self, bytes: &[u8]) {
        if self.capacity == 0 {
            return;
        }
        for line in String::from_utf8_lossy(bytes).lines() {
            if line.is_empty() {
                continue;
            }
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line.to_string());
        }
    }

    /// The newest `n` lines, oldest first
    pub fn newest(&self, n: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Everything a record is written to
struct Sink {
    file: RollingFile,
    recent: RecentLines,
}

impl Sink {
    fn new(file: RollingFile, capacity: usize) -> Self {
        Self {
            file,
            recent: RecentLines::new(capacity),
        }
    }

    fn write_record(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.recent.push(bytes);
        self.file.write_record(bytes)
    }
}

/// `MakeWriter` handing out handles to the shared sink
#[derive(Clone)]
struct SinkWriter(SharedSink);

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut sink = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        sink.write_record(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut sink = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log sink poisoned"))?;
        sink.file.flush()
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Initialize the global logger writing under `log_dir`.
///
/// Level filtering follows `RUST_LOG`, defaulting to `info`. Calling this
/// again after a successful init is a no-op.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    if SINK.get().is_some() {
        return Ok(());
    }

    let file = RollingFile::open(&log_dir, app_name, MAX_FILE_BYTES, MAX_ARCHIVES)
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;
    let sink = Arc::new(Mutex::new(Sink::new(file, RECENT_CAPACITY)));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_ansi(false)
        .with_writer(SinkWriter(sink.clone()))
        .try_init()
        .map_err(|e| format!("Failed to install log subscriber: {}", e))?;

    let _ = SINK.set(sink);
    tracing::info!(target: "rolling_logger", app = app_name, "logger initialized");
    Ok(())
}

/// Path of the active log file, once initialized
pub fn log_file_path() -> Option<PathBuf> {
    let sink = SINK.get()?;
    let sink = sink.lock().ok()?;
    Some(sink.file.path())
}

/// The newest `n` logged lines, oldest first. Empty before initialization.
pub fn recent_lines(n: usize) -> Vec<String> {
    SINK.get()
        .and_then(|sink| sink.lock().ok().map(|sink| sink.recent.newest(n)))
        .unwrap_or_default()
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_init(SINK.get())?;
    tracing::info!(target: "rolling_logger", "{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_init(SINK.get())?;
    tracing::warn!(target: "rolling_logger", "{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_init(SINK.get())?;
    tracing::error!(target: "rolling_logger", "{}", msg);
    Ok(())
}

fn ensure_init(sink: Option<&SharedSink>) -> Result<(), String> {
    sink.map(|_| ())
        .ok_or_else(|| "Logger not initialized".to_string())
}
