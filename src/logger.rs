//! File logging for pipeline runs.
//!
//! A [`Logger`] owns a `tracing` dispatcher that writes one line per event to
//! `<dir>/<MM_DD_YYYY_HH_MM_SS>.log`. Nothing is configured implicitly: the
//! binary calls [`Logger::install`] once, tests and embedded runs use
//! [`Logger::scoped`] so several independent runs can share a process.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use chrono::Local;
use tracing::dispatcher::{self, DefaultGuard, Dispatch};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::LoggingConfig;
use crate::error::{ErrorKind, PipelineError, Result};

const FILE_TIMESTAMP: &str = "%m_%d_%Y_%H_%M_%S";
const LINE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// `[ <timestamp> ] <line> <target> - <LEVEL> - <message>`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "[ {} ] {} {} - {} - ",
            Local::now().format(LINE_TIMESTAMP),
            meta.line().unwrap_or(0),
            meta.target(),
            meta.level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub struct Logger {
    path: PathBuf,
    dispatch: Dispatch,
}

impl Logger {
    /// Creates `dir` if needed and opens the timestamped log file right away,
    /// so the file exists even if nothing is ever logged.
    pub fn new<P: AsRef<Path>>(dir: P, level: Level) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let file_name = format!("{}.log", Local::now().format(FILE_TIMESTAMP));
        let path = dir.join(file_name);
        let file: File = OpenOptions::new().create(true).append(true).open(&path)?;

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .event_format(LineFormat)
            .finish();

        Ok(Self {
            path,
            dispatch: Dispatch::new(subscriber),
        })
    }

    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let level = Level::from_str(&config.level).map_err(|e| {
            PipelineError::new(ErrorKind::InvalidParameter {
                name: "logging.level".to_string(),
                value: config.level.clone(),
                reason: e.to_string(),
            })
        })?;
        Self::new(&config.dir, level)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes this logger the process-wide default. Only the first call in a
    /// process succeeds.
    pub fn install(self) -> Result<PathBuf> {
        dispatcher::set_global_default(self.dispatch).map_err(|e| {
            PipelineError::new(ErrorKind::InvalidParameter {
                name: "logger".to_string(),
                value: self.path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(self.path)
    }

    /// Routes events on the current thread to this logger until the guard drops.
    pub fn scoped(&self) -> DefaultGuard {
        dispatcher::set_default(&self.dispatch)
    }
}
