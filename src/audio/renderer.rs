use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use thiserror::Error;

pub const MAX_ACTIVE: usize = 8;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("sound file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("no audio player could be launched for {}: {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("too many players already running")]
    Busy,
}

#[derive(Debug)]
struct Playback {
    child: Child,
    fallbacks: Vec<Command>,
}

// Spawns the platform audio player and keeps the children around so they can
// be reaped or killed later. Never waits on a child it just started.
#[derive(Debug, Default)]
pub struct Player {
    active: Vec<Playback>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&mut self) -> usize {
        self.reap();
        self.active.len()
    }

    pub fn play_file(&mut self, path: &Path, volume: f32) -> Result<u32, PlaybackError> {
        if !path.is_file() {
            return Err(PlaybackError::Missing(path.to_path_buf()));
        }

        self.reap();
        if self.active.len() >= MAX_ACTIVE {
            return Err(PlaybackError::Busy);
        }

        self.launch(player_commands(path, volume))
            .map_err(|source| PlaybackError::Launch {
                path: path.to_path_buf(),
                source,
            })
    }

    // The first candidate that spawns plays; the rest stay queued in case it
    // exits with failure.
    fn launch(&mut self, candidates: Vec<Command>) -> io::Result<u32> {
        let mut candidates = candidates.into_iter();
        let mut last_err = None;
        while let Some(mut cmd) = candidates.next() {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            match cmd.spawn() {
                Ok(child) => {
                    let pid = child.id();
                    tracing::debug!(pid, program = ?cmd.get_program(), "spawned player");
                    self.active.push(Playback {
                        child,
                        fallbacks: candidates.collect(),
                    });
                    return Ok(pid);
                }
                Err(err) => {
                    tracing::debug!(program = ?cmd.get_program(), error = %err, "player unavailable");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no player")))
    }

    fn retry(&mut self, fallbacks: Vec<Command>) {
        if fallbacks.is_empty() {
            return;
        }
        if let Err(err) = self.launch(fallbacks) {
            tracing::warn!(error = %err, "fallback player could not be launched");
        }
    }

    pub fn reap(&mut self) {
        let mut retries = Vec::new();
        self.active.retain_mut(|playback| match playback.child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    tracing::debug!(pid = playback.child.id(), %status, "player exited with failure");
                    retries.push(std::mem::take(&mut playback.fallbacks));
                }
                false
            }
            Ok(None) => true,
            Err(err) => {
                tracing::debug!(pid = playback.child.id(), error = %err, "lost track of player");
                false
            }
        });

        for fallbacks in retries {
            self.retry(fallbacks);
        }
    }

    pub fn wait_all(&mut self) {
        while let Some(mut playback) = self.active.pop() {
            match playback.child.wait() {
                Ok(status) if !status.success() => {
                    tracing::warn!(pid = playback.child.id(), %status, "player exited with failure");
                    self.retry(playback.fallbacks);
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "wait on player failed"),
            }
        }
    }

    pub fn terminate_all(&mut self) {
        for mut playback in self.active.drain(..) {
            let _ = playback.child.kill();
            let _ = playback.child.wait();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.terminate_all();
    }
}

fn player_commands(path: &Path, volume: f32) -> Vec<Command> {
    let volume = volume.clamp(0.0, 1.0);

    if cfg!(target_os = "macos") {
        let mut afplay = Command::new("afplay");
        afplay.arg("-v").arg(volume.to_string()).arg(path);
        return vec![afplay];
    }

    if cfg!(target_os = "windows") {
        let quoted = path.display().to_string().replace('\'', "''");
        let mut ps = Command::new("powershell.exe");
        ps.args(["-NoProfile", "-NonInteractive", "-Command"]).arg(format!(
            "(New-Object Media.SoundPlayer '{quoted}').PlaySync()"
        ));
        return vec![ps];
    }

    let mut paplay = Command::new("paplay");
    paplay
        .arg(format!("--volume={}", (volume * 65536.0).round() as u32))
        .arg(path);
    let mut aplay = Command::new("aplay");
    aplay.arg("-q").arg(path);
    vec![paplay, aplay]
}
