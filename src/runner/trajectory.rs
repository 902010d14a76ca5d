use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description};
use tracing::{debug, warn};

use crate::env::{Action, Observation, StepResult};

use super::episode::EpisodeSummary;
use super::observer::EpisodeObserver;

/// One CSV file per episode with the pipette path as the agent saw it
struct TrajectoryFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TrajectoryFile {
    fn create(folder: &Path, episode: usize, observation: &Observation) -> io::Result<Self> {
        let path = folder.join(format!("{}-episode-{}.csv", timestamp()?, episode + 1));
        let mut file = TrajectoryFile {
            writer: BufWriter::new(File::create(&path)?),
            path,
        };

        writeln!(file.writer, "step,x,y,z,goal_x,goal_y,goal_z,reward,distance")?;
        file.append_row(0, observation, 0.0, f32::NAN)?;
        Ok(file)
    }

    fn append_row(
        &mut self,
        step: usize,
        observation: &Observation,
        reward: f32,
        distance: f32,
    ) -> io::Result<()> {
        let [x, y, z] = observation.position();
        let [gx, gy, gz] = observation.goal();
        writeln!(
            self.writer,
            "{},{},{},{},{},{},{},{},{}",
            step, x, y, z, gx, gy, gz, reward, distance
        )
    }

    fn finish(mut self) -> io::Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

fn timestamp() -> io::Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description::parse("[year][month][day]-[hour][minute][second]")
        .map_err(io::Error::other)?;
    now.format(&format).map_err(io::Error::other)
}

/// Writes each episode's trajectory to `<folder>/<timestamp>-episode-<n>.csv`
///
/// A file left open by an aborted episode is finished when the next episode
/// starts or when the recorder is dropped.
pub struct TrajectoryRecorder {
    folder: PathBuf,
    current: Option<TrajectoryFile>,
    steps: usize,
    files_written: usize,
    last_written: Option<PathBuf>,
}

impl TrajectoryRecorder {
    pub fn new(folder: impl AsRef<Path>) -> io::Result<Self> {
        let folder = folder.as_ref().to_path_buf();
        if !folder.exists() {
            std::fs::create_dir_all(&folder)?;
        }
        Ok(Self {
            folder,
            current: None,
            steps: 0,
            files_written: 0,
            last_written: None,
        })
    }

    /// Number of files completed so far
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }

    fn abandon(&mut self, err: io::Error) {
        if let Some(file) = self.current.take() {
            warn!("Stopped recording {}: {}", file.path.display(), err);
        }
    }

    fn finish_current(&mut self) {
        let Some(file) = self.current.take() else {
            return;
        };
        match file.finish() {
            Ok(path) => {
                debug!("Trajectory written to {}", path.display());
                self.files_written += 1;
                self.last_written = Some(path);
            }
            Err(err) => warn!("Could not finish trajectory file: {}", err),
        }
    }
}

impl Drop for TrajectoryRecorder {
    fn drop(&mut self) {
        self.finish_current();
    }
}

impl EpisodeObserver for TrajectoryRecorder {
    fn on_episode_start(&mut self, episode: usize, observation: &Observation, _threshold: f32) {
        self.finish_current();
        self.steps = 0;
        match TrajectoryFile::create(&self.folder, episode, observation) {
            Ok(file) => self.current = Some(file),
            Err(err) => {
                warn!("Could not create trajectory file in {}: {}", self.folder.display(), err);
            }
        }
    }

    fn on_step(&mut self, _episode: usize, _action: &Action, result: &StepResult) {
        self.steps += 1;
        let step = self.steps;
        if let Some(file) = self.current.as_mut()
            && let Err(err) = file.append_row(step, &result.observation, result.reward, result.distance)
        {
            self.abandon(err);
        }
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {
        self.finish_current();
    }
}
