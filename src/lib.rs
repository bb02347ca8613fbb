pub mod adapters;
pub mod audio;
pub mod cli;
pub mod config;
pub mod engine;
pub mod events;
pub mod status;
pub mod terminal;

use adapters::Output;
use anyhow::Context;
use audio::renderer::{PlaybackError, Player};
use audio::resolver::SoundResolver;
use chrono::Local;
use cli::{Cli, Commands};
use config::{Config, ConfigFile, ConfigProvider};
use engine::{Action, Engine};
use events::{Cue, HostEvent};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use terminal::{HostCapabilities, TerminalDetection};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    setup_tracing(cli.verbose);

    let provider = ConfigFile::new(cli.config.clone());

    match cli.command {
        Commands::Listen(args) => listen(args, provider),
        Commands::TestSound(args) => test_sound(args, &provider),
        Commands::Status => status(&provider),
        Commands::Toggle => toggle(cli.config.as_deref()),
        Commands::Pack(args) => pack(args, cli.config.as_deref()),
        Commands::Config(args) => config_cmd(args, cli.config.as_deref()),
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn listen(args: cli::ListenArgs, provider: ConfigFile) -> anyhow::Result<()> {
    let detection = TerminalDetection::negotiate(HostCapabilities {
        shell_integration: args.shell_integration,
    });
    tracing::info!(?detection, "listening for host events");

    let mut engine = Engine::new(provider, detection);
    let mut player = Player::new();
    let mut out = std::io::stdout();

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || read_host_lines(std::io::stdin().lock(), tx));

    emit(&mut out, &Output::Status {
        text: &engine.status_text(Local::now()),
    })?;

    let interval = Duration::from_secs(args.status_interval.max(1));
    let mut next_status = Instant::now() + interval;
    loop {
        let received = rx.recv_timeout(next_status.saturating_duration_since(Instant::now()));
        let mut status_due = false;

        match received {
            Ok(line) => match adapters::parse_line(&line) {
                Ok(Some(event)) => {
                    let now = Local::now();
                    let actions = engine.handle(&event, now);
                    for action in &actions {
                        dispatch(action, &mut player, args.dry_run, &mut out)?;
                    }
                    status_due = matches!(
                        event,
                        HostEvent::Diagnostics { .. } | HostEvent::ConfigChanged
                    );
                }
                Ok(None) => {}
                Err(err) => tracing::warn!(error = ?err, "skipping host line"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if Instant::now() >= next_status {
            status_due = true;
            next_status = Instant::now() + interval;
        }
        if status_due {
            emit(&mut out, &Output::Status {
                text: &engine.status_text(Local::now()),
            })?;
        }
    }

    tracing::info!("host stream closed; stopping players");
    player.terminate_all();
    Ok(())
}

fn read_host_lines(mut input: impl BufRead, tx: mpsc::Sender<String>) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "stdin read failed");
                break;
            }
        }

        let line = match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "skipping host line that is not UTF-8");
                continue;
            }
        };
        if tx.send(line).is_err() {
            break;
        }
    }
}

fn dispatch(
    action: &Action,
    player: &mut Player,
    dry_run: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        Action::Play(request) if !dry_run => {
            if let Err(err) = player.play_file(&request.path, request.volume) {
                tracing::warn!(error = %err, kind = %request.kind, "playback failed");
            }
            Ok(())
        }
        _ => emit(out, &Output::from(action)),
    }
}

fn emit(out: &mut impl Write, output: &Output<'_>) -> anyhow::Result<()> {
    writeln!(out, "{}", output.to_line()?).context("write to host")?;
    out.flush().context("flush host output")
}

fn test_sound(args: cli::TestSoundArgs, provider: &impl ConfigProvider) -> anyhow::Result<()> {
    let config = provider.snapshot();
    let cue = Cue::from_parts(args.kind, args.tier).with_context(|| {
        format!(
            "tier {} is not valid for {} sounds",
            args.tier.unwrap_or(1),
            args.kind
        )
    })?;

    let path = SoundResolver::new(&config).resolve(cue);
    println!("{}", path.display());

    let mut player = Player::new();
    match player.play_file(&path, config.volume) {
        Ok(_) => {
            player.wait_all();
            Ok(())
        }
        Err(err @ PlaybackError::Missing(_)) => Err(err).context("resolve test sound"),
        Err(err) => Err(err).context("play test sound"),
    }
}

fn status(provider: &impl ConfigProvider) -> anyhow::Result<()> {
    let config = provider.snapshot();
    println!("{}", status::render(&config, Local::now().time(), 0));
    Ok(())
}

fn toggle(explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = write_target(explicit)?;
    let mut config = load_for_write(&path)?;
    config.enabled = !config.enabled;
    config.save_to_path(&path)?;

    if config.enabled {
        println!("FAAAH is ON! Errors will be punished.");
    } else {
        println!("FAAAH is OFF. You're safe... for now.");
    }
    Ok(())
}

fn pack(args: cli::PackArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    let path = write_target(explicit)?;
    let mut config = load_for_write(&path)?;
    config.sound_pack = args.name.trim().to_string();
    config.validate().context("sound pack rejected")?;

    let pack_dir = config.media_root().join("packs").join(&config.sound_pack);
    if !pack_dir.is_dir() {
        tracing::warn!(dir = %pack_dir.display(), "pack not installed; default sounds will be used");
    }

    config.save_to_path(&path)?;
    println!("Sound pack: {}", config.sound_pack);
    Ok(())
}

fn config_cmd(args: cli::ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    if args.init {
        let path = match explicit {
            Some(path) => {
                Config::default().save_to_path(path)?;
                path.to_path_buf()
            }
            None => Config::init_default()?,
        };
        println!("Initialized config at {}", path.display());
        return Ok(());
    }

    if args.show {
        let config = load_explicit(explicit)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.validate {
        let config = load_explicit(explicit)?;
        config.validate()?;
        println!("Config OK");
        return Ok(());
    }

    let path = write_target(explicit)?;
    println!("{}", path.display());
    Ok(())
}

fn load_explicit(explicit: Option<&Path>) -> anyhow::Result<Config> {
    match explicit {
        Some(path) => Config::load_from_path(path),
        None => Config::load().context("load config"),
    }
}

fn write_target(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::writable_path(),
    }
}

fn load_for_write(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::load_from_path(path)
    } else {
        Ok(Config::default())
    }
}
