pub mod cooldown;
pub mod delta;
pub mod quiet_hours;
pub mod streak;
pub mod syntax;

use crate::audio::resolver::SoundResolver;
use crate::config::{Config, ConfigProvider};
use crate::events::{Cue, ErrorTier, HostEvent, Kind, ResourceKey, WarningTier};
use crate::status;
use crate::terminal::{self, TerminalDetection};
use chrono::{DateTime, Local, Utc};
use cooldown::CooldownTracker;
use delta::{DeltaTracker, DiagnosticSource};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use streak::StreakTracker;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayRequest {
    pub kind: Kind,
    pub cue: Cue,
    pub path: PathBuf,
    pub volume: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Play(PlayRequest),
    Notification(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppressed {
    Disabled,
    KindDisabled,
    QuietHours,
    CoolingDown,
}

#[derive(Debug, Default)]
pub struct EngineState {
    pub deltas: DeltaTracker,
    pub cooldowns: CooldownTracker,
    pub streak: StreakTracker,
    warned_missing: HashSet<PathBuf>,
}

pub struct Engine<P> {
    config: P,
    terminal: TerminalDetection,
    state: EngineState,
}

impl<P: ConfigProvider> Engine<P> {
    pub fn new(config: P, terminal: TerminalDetection) -> Self {
        Self {
            config,
            terminal,
            state: EngineState::default(),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn terminal_detection(&self) -> TerminalDetection {
        self.terminal
    }

    pub fn handle(&mut self, event: &HostEvent, now: DateTime<Local>) -> Vec<Action> {
        match event {
            HostEvent::Diagnostics { resources } => {
                let batch: Vec<ResourceKey> = resources.iter().map(|r| r.uri.clone()).collect();
                self.on_diagnostics(&batch, resources.as_slice(), now)
            }
            HostEvent::TaskEnded { task, exit_code } => {
                tracing::debug!(task = task.as_deref().unwrap_or("?"), ?exit_code, "task ended");
                self.on_task_ended(*exit_code, now)
            }
            HostEvent::DebugSessionEnded => self.on_debug_session_ended(now),
            HostEvent::TerminalCommandEnded { exit_code } => {
                self.on_terminal_command_ended(*exit_code, now)
            }
            HostEvent::TerminalOutput { data } => self.on_terminal_output(data, now),
            HostEvent::ConfigChanged => Vec::new(),
        }
    }

    pub fn on_diagnostics<S>(
        &mut self,
        batch: &[ResourceKey],
        source: &S,
        now: DateTime<Local>,
    ) -> Vec<Action>
    where
        S: DiagnosticSource + ?Sized,
    {
        let config = self.config.snapshot();
        let mut actions = Vec::new();

        let delta = self.state.deltas.apply(batch, source);
        tracing::debug!(
            resources = batch.len(),
            new_errors = delta.max_new_errors,
            new_warnings = delta.max_new_warnings,
            fix = delta.any_fix,
            "diagnostics changed"
        );

        for resource in &delta.victories {
            tracing::debug!(%resource, "errors cleared");
            self.try_play(&config, Cue::Victory, now, &mut actions);
        }

        if delta.max_new_errors > 0 {
            let length = self.state.streak.on_new_error_batch();
            let tier = if delta.all_new_errors_syntax {
                ErrorTier::Tier1
            } else {
                ErrorTier::from_delta(delta.max_new_errors)
            };
            self.try_play(&config, Cue::Error(tier), now, &mut actions);

            if let Some(reached) = self.state.streak.check_threshold(config.streak_threshold_toast)
            {
                tracing::info!(streak = length, "streak threshold reached");
                actions.push(Action::Notification(Notification {
                    level: NotificationLevel::Warning,
                    message: streak::shame_message(reached),
                }));
            }
        }

        if delta.max_new_warnings > 0 {
            let tier = WarningTier::from_delta(delta.max_new_warnings);
            self.try_play(&config, Cue::Warning(tier), now, &mut actions);
        }

        if delta.any_fix {
            self.state.streak.on_fix();
        }

        actions
    }

    pub fn on_task_ended(&mut self, exit_code: Option<i32>, now: DateTime<Local>) -> Vec<Action> {
        if !terminal::is_failed_exit(exit_code) {
            return Vec::new();
        }
        self.play_once(Cue::Error(ErrorTier::Tier1), now)
    }

    pub fn on_debug_session_ended(&mut self, now: DateTime<Local>) -> Vec<Action> {
        self.play_once(Cue::Error(ErrorTier::Tier1), now)
    }

    pub fn on_terminal_command_ended(
        &mut self,
        exit_code: Option<i32>,
        now: DateTime<Local>,
    ) -> Vec<Action> {
        if self.terminal != TerminalDetection::ExitCode {
            tracing::debug!("exit code ignored; output patterns active");
            return Vec::new();
        }
        if !terminal::is_failed_exit(exit_code) {
            return Vec::new();
        }
        self.play_once(Cue::TerminalMistype, now)
    }

    pub fn on_terminal_output(&mut self, data: &str, now: DateTime<Local>) -> Vec<Action> {
        if self.terminal != TerminalDetection::OutputPatterns {
            return Vec::new();
        }
        if !terminal::looks_like_failure(data) {
            return Vec::new();
        }
        self.play_once(Cue::TerminalMistype, now)
    }

    pub fn status_text(&self, now: DateTime<Local>) -> String {
        let config = self.config.snapshot();
        status::render(&config, now.time(), self.state.deltas.total_errors())
    }

    fn play_once(&mut self, cue: Cue, now: DateTime<Local>) -> Vec<Action> {
        let config = self.config.snapshot();
        let mut actions = Vec::new();
        self.try_play(&config, cue, now, &mut actions);
        actions
    }

    fn try_play(
        &mut self,
        config: &Config,
        cue: Cue,
        now: DateTime<Local>,
        actions: &mut Vec<Action>,
    ) {
        let kind = cue.kind();
        let utc = now.with_timezone(&Utc);

        if let Err(reason) = self.gate(config, kind, now, utc) {
            tracing::debug!(%kind, ?reason, "cue suppressed");
            return;
        }

        let path = SoundResolver::new(config).resolve(cue);
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "sound file not found; skipping");
            if self.state.warned_missing.insert(path.clone()) {
                actions.push(Action::Notification(Notification {
                    level: NotificationLevel::Warning,
                    message: format!("Sound file not found: {}", path.display()),
                }));
            }
            return;
        }

        tracing::info!(%kind, path = %path.display(), "playing");
        self.state.cooldowns.record_played(kind, utc);
        actions.push(Action::Play(PlayRequest {
            kind,
            cue,
            path,
            volume: config.volume,
        }));
    }

    fn gate(
        &self,
        config: &Config,
        kind: Kind,
        now: DateTime<Local>,
        utc: DateTime<Utc>,
    ) -> Result<(), Suppressed> {
        if !config.enabled {
            return Err(Suppressed::Disabled);
        }

        let kind_enabled = match kind {
            Kind::Error => true,
            Kind::Warning => config.warnings_enabled,
            Kind::Victory => config.victory_enabled,
            Kind::TerminalMistype => config.terminal_sound_enabled,
        };
        if !kind_enabled {
            return Err(Suppressed::KindDisabled);
        }

        if quiet_hours::is_quiet(&config.quiet_hours_start, &config.quiet_hours_end, now.time()) {
            return Err(Suppressed::QuietHours);
        }

        if self
            .state
            .cooldowns
            .is_cooling_down(kind, config.cooldown_ms, utc)
        {
            return Err(Suppressed::CoolingDown);
        }

        Ok(())
    }
}
