use crate::config::Config;
use crate::events::{Cue, ErrorTier, Kind, WarningTier};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};

const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

pub struct Resolution<'a> {
    pub config: &'a Config,
    pub media_root: &'a Path,
    pub cue: Cue,
}

type Layer = fn(&Resolution<'_>, &mut dyn RngCore) -> Option<PathBuf>;

const TIERED_LAYERS: &[Layer] = &[
    random_folder,
    single_file_override,
    tier_override,
    pack_file,
    builtin_default,
];

const UNTIERED_LAYERS: &[Layer] = &[single_file_override, pack_file, builtin_default];

pub struct SoundResolver<'a> {
    config: &'a Config,
    media_root: PathBuf,
}

impl<'a> SoundResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            media_root: config.media_root(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn resolve(&self, cue: Cue) -> PathBuf {
        self.resolve_with_rng(cue, &mut rand::thread_rng())
    }

    pub fn resolve_with_rng(&self, cue: Cue, rng: &mut dyn RngCore) -> PathBuf {
        let resolution = Resolution {
            config: self.config,
            media_root: &self.media_root,
            cue,
        };

        let layers = match cue {
            Cue::Error(_) | Cue::Warning(_) => TIERED_LAYERS,
            Cue::Victory | Cue::TerminalMistype => UNTIERED_LAYERS,
        };

        layers
            .iter()
            .find_map(|layer| layer(&resolution, &mut *rng))
            .unwrap_or_else(|| resolution.media_root.join(builtin_file(cue.kind())))
    }
}

pub fn random_folder(res: &Resolution<'_>, rng: &mut dyn RngCore) -> Option<PathBuf> {
    let folder = match res.cue {
        Cue::Error(_) => &res.config.custom_sound_folder,
        Cue::Warning(_) => &res.config.custom_warning_sound_folder,
        Cue::Victory | Cue::TerminalMistype => return None,
    };
    let folder = non_empty(folder)?;

    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(folder, error = %err, "sound folder unreadable; falling through");
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_audio_file(path))
        .collect();
    candidates.sort();

    candidates.choose(rng).cloned()
}

pub fn single_file_override(res: &Resolution<'_>, _rng: &mut dyn RngCore) -> Option<PathBuf> {
    let config = res.config;
    let path = match res.cue.kind() {
        Kind::Error => &config.custom_sound_path,
        Kind::Warning => &config.custom_warning_sound_path,
        Kind::Victory => &config.custom_victory_sound_path,
        Kind::TerminalMistype => &config.custom_terminal_sound_path,
    };
    non_empty(path).map(PathBuf::from)
}

pub fn tier_override(res: &Resolution<'_>, _rng: &mut dyn RngCore) -> Option<PathBuf> {
    let errors = &res.config.error_tier_sounds;
    let warnings = &res.config.warning_tier_sounds;
    let path = match res.cue {
        Cue::Error(ErrorTier::Tier1) => &errors.tier1,
        Cue::Error(ErrorTier::Tier2) => &errors.tier2,
        Cue::Error(ErrorTier::Tier3) => &errors.tier3,
        Cue::Warning(WarningTier::Tier1) => &warnings.tier1,
        Cue::Warning(WarningTier::Tier2) => &warnings.tier2,
        Cue::Victory | Cue::TerminalMistype => return None,
    };
    non_empty(path).map(PathBuf::from)
}

/// The active pack's file, or the pack-agnostic file of the same name when
/// the pack doesn't ship one. Neither on disk means the built-in default.
pub fn pack_file(res: &Resolution<'_>, _rng: &mut dyn RngCore) -> Option<PathBuf> {
    let filename = pack_filename(res.cue);
    let pack = res.config.sound_pack.trim();

    if !pack.is_empty() {
        let candidate = res.media_root.join("packs").join(pack).join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let fallback = res.media_root.join(filename);
    if fallback.is_file() {
        return Some(fallback);
    }

    None
}

pub fn builtin_default(res: &Resolution<'_>, _rng: &mut dyn RngCore) -> Option<PathBuf> {
    Some(res.media_root.join(builtin_file(res.cue.kind())))
}

pub fn pack_filename(cue: Cue) -> &'static str {
    match cue {
        Cue::Error(ErrorTier::Tier1) => "faah-low.wav",
        Cue::Error(ErrorTier::Tier2) => "faah-mid.wav",
        Cue::Error(ErrorTier::Tier3) => "faah-high.wav",
        Cue::Warning(WarningTier::Tier1) => "aa-low.wav",
        Cue::Warning(WarningTier::Tier2) => "aa-high.wav",
        Cue::Victory => "victory.wav",
        Cue::TerminalMistype => "ahhh.wav",
    }
}

pub fn builtin_file(kind: Kind) -> &'static str {
    match kind {
        Kind::Error => "faah.wav",
        Kind::Warning => "aa.wav",
        Kind::Victory => "victory.wav",
        Kind::TerminalMistype => "ahhh.wav",
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = Config {
                media_dir: Some(dir.path().join("media")),
                ..Config::default()
            };
            fs::create_dir_all(dir.path().join("media")).unwrap();
            Self { dir, config }
        }

        fn touch(&self, rel: &str) -> PathBuf {
            let path = self.dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"RIFF").unwrap();
            path
        }

        fn resolve(&self, cue: Cue) -> PathBuf {
            let mut rng = StdRng::seed_from_u64(7);
            SoundResolver::new(&self.config).resolve_with_rng(cue, &mut rng)
        }
    }

    #[test]
    fn layers_apply_in_priority_order() {
        let mut fx = Fixture::new();
        let pick = fx.touch("folder/only.wav");
        let legacy = fx.touch("legacy.wav");
        let tiered = fx.touch("tier1.wav");
        let pack = fx.touch("media/packs/meme/faah-low.wav");

        fx.config.custom_sound_folder = fx.dir.path().join("folder").display().to_string();
        fx.config.custom_sound_path = legacy.display().to_string();
        fx.config.error_tier_sounds.tier1 = tiered.display().to_string();

        let cue = Cue::Error(ErrorTier::Tier1);
        assert_eq!(fx.resolve(cue), pick);

        fx.config.custom_sound_folder.clear();
        assert_eq!(fx.resolve(cue), legacy);

        fx.config.custom_sound_path.clear();
        assert_eq!(fx.resolve(cue), tiered);

        fx.config.error_tier_sounds.tier1.clear();
        assert_eq!(fx.resolve(cue), pack);
    }

    #[test]
    fn empty_or_missing_folder_falls_through() {
        let mut fx = Fixture::new();
        fs::create_dir_all(fx.dir.path().join("empty")).unwrap();
        fx.touch("empty/readme.txt");
        let legacy = fx.touch("legacy.wav");
        fx.config.custom_sound_path = legacy.display().to_string();

        fx.config.custom_sound_folder = fx.dir.path().join("empty").display().to_string();
        assert_eq!(fx.resolve(Cue::Error(ErrorTier::Tier2)), legacy);

        fx.config.custom_sound_folder = fx.dir.path().join("nope").display().to_string();
        assert_eq!(fx.resolve(Cue::Error(ErrorTier::Tier2)), legacy);
    }

    #[test]
    fn random_pick_stays_inside_folder() {
        let mut fx = Fixture::new();
        let a = fx.touch("folder/a.WAV");
        let b = fx.touch("folder/b.mp3");
        fx.touch("folder/c.txt");
        fx.config.custom_warning_sound_folder =
            fx.dir.path().join("folder").display().to_string();

        let resolver = SoundResolver::new(&fx.config);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let picked = resolver.resolve_with_rng(Cue::Warning(WarningTier::Tier1), &mut rng);
            assert!(picked == a || picked == b, "unexpected pick {}", picked.display());
        }
    }

    #[test]
    fn missing_pack_file_uses_pack_agnostic_name() {
        let fx = Fixture::new();
        let generic = fx.touch("media/faah-high.wav");
        assert_eq!(fx.resolve(Cue::Error(ErrorTier::Tier3)), generic);
    }

    #[test]
    fn nothing_on_disk_still_yields_builtin_path() {
        let fx = Fixture::new();
        let media = fx.dir.path().join("media");
        assert_eq!(fx.resolve(Cue::Error(ErrorTier::Tier2)), media.join("faah.wav"));
        assert_eq!(fx.resolve(Cue::Warning(WarningTier::Tier2)), media.join("aa.wav"));
        assert_eq!(fx.resolve(Cue::TerminalMistype), media.join("ahhh.wav"));
    }

    #[test]
    fn untiered_kinds_ignore_folders_and_tiers() {
        let mut fx = Fixture::new();
        fx.touch("folder/a.wav");
        fx.config.custom_sound_folder = fx.dir.path().join("folder").display().to_string();
        let pack = fx.touch("media/packs/meme/victory.wav");
        assert_eq!(fx.resolve(Cue::Victory), pack);

        let custom = fx.touch("yay.wav");
        fx.config.custom_victory_sound_path = custom.display().to_string();
        assert_eq!(fx.resolve(Cue::Victory), custom);
    }

    #[test]
    fn other_pack_is_not_consulted() {
        let mut fx = Fixture::new();
        fx.touch("media/packs/meme/aa-low.wav");
        let retro = fx.touch("media/packs/retro/aa-low.wav");
        fx.config.sound_pack = "retro".to_string();
        assert_eq!(fx.resolve(Cue::Warning(WarningTier::Tier1)), retro);
    }

    #[test]
    fn resolution_is_stable_without_folders() {
        let fx = Fixture::new();
        fx.touch("media/packs/meme/faah-mid.wav");
        let cue = Cue::Error(ErrorTier::Tier2);
        assert_eq!(fx.resolve(cue), fx.resolve(cue));
    }
}
