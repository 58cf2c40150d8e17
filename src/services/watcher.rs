use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use log::{debug, error, info};

use crate::config::AppConfig;
use crate::errors::{HandicapError, HandicapResult};

use super::pipeline::{CycleReport, Pipeline};

const SLEEP_SLICE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Checking,
    Processing,
    ErrorBackoff,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Unchanged,
    Processed(CycleReport),
    Failed,
}

/// Polls the export file and re-runs the pipeline whenever it changes or the
/// previous cycle failed.
pub struct IngestionLoop<'a> {
    config: &'a AppConfig,
    pipeline: Pipeline<'a>,
    state: LoopState,
    last_modified: Option<SystemTime>,
    pending_error: bool,
}

impl<'a> IngestionLoop<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            pipeline: Pipeline::new(config),
            state: LoopState::Idle,
            last_modified: None,
            pending_error: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs until `shutdown` is raised. The flag is only observed between
    /// cycles, so a started cycle always finishes.
    pub fn run(&mut self, shutdown: &AtomicBool) -> HandicapResult<()> {
        info!(
            "Watching {} every {}s",
            self.config.paths.export_file.display(),
            self.config.import.poll_interval.as_secs()
        );

        while !shutdown.load(Ordering::SeqCst) {
            self.tick()?;
            self.sleep_interval(shutdown);
        }

        info!("Interrupted, stopping");
        Ok(())
    }

    /// One pass through Checking and, when needed, Processing. Never sleeps.
    /// Transient failures are absorbed into ErrorBackoff; fatal ones are returned.
    pub fn tick(&mut self) -> HandicapResult<Tick> {
        self.state = LoopState::Checking;

        let modified = match self.read_modified() {
            Ok(modified) => modified,
            Err(e) => return self.back_off(e),
        };

        if !self.needs_processing(modified) {
            debug!("Export unchanged");
            self.state = LoopState::Idle;
            return Ok(Tick::Unchanged);
        }

        self.state = LoopState::Processing;
        match self.pipeline.run_cycle() {
            Ok(report) => {
                self.last_modified = Some(modified);
                self.pending_error = false;
                self.state = LoopState::Idle;
                Ok(Tick::Processed(report))
            }
            Err(e) => self.back_off(e),
        }
    }

    fn read_modified(&self) -> HandicapResult<SystemTime> {
        let path = &self.config.paths.export_file;
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| HandicapError::source_io(path, e))
    }

    fn needs_processing(&self, modified: SystemTime) -> bool {
        self.pending_error || self.last_modified != Some(modified)
    }

    fn back_off(&mut self, e: HandicapError) -> HandicapResult<Tick> {
        if !e.is_transient() {
            return Err(e);
        }

        error!("{}", e);
        self.pending_error = true;
        self.state = LoopState::ErrorBackoff;
        Ok(Tick::Failed)
    }

    fn sleep_interval(&self, shutdown: &AtomicBool) {
        let deadline = Instant::now() + self.config.import.poll_interval;
        while !shutdown.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}
