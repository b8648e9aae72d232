use rodio::{Decoder, OutputStream, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{info, warn};

use crate::error::SoundError;
use crate::pomodoro::collaborators::Sounder;

const SYSTEM_SOUND_PATHS: [&str; 3] = [
    "/usr/share/sounds/ubuntu/stereo/system-ready.ogg",
    "/usr/share/sounds/freedesktop/stereo/complete.oga",
    "/usr/share/sounds/freedesktop/stereo/alarm-clock-elapsed.oga",
];

/// Pick the alert sound: an explicit path if it decodes, otherwise the first
/// installed system sound that does.
pub fn load_system_sound(explicit: Option<&Path>) -> Option<PathBuf> {
    let candidates = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_SOUND_PATHS.iter().map(PathBuf::from));
    find_sound(candidates, |path| decode(path).is_ok())
}

fn find_sound(
    candidates: impl IntoIterator<Item = PathBuf>,
    loadable: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    for path in candidates {
        if !path.is_file() {
            continue;
        }
        if loadable(&path) {
            info!(path = %path.display(), "Loaded alert sound");
            return Some(path);
        }
        warn!(path = %path.display(), "Failed to load sound file");
    }
    warn!("Could not load any system sound. Audio alerts will be disabled.");
    None
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

/// Decode `path` and play it to the default output, blocking until done.
pub fn play_file(path: &Path) -> Result<(), SoundError> {
    let source = decode(path)?;
    let (_stream, stream_handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&stream_handle)?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Plays the alert file on a detached thread so the caller never waits.
#[derive(Debug, Clone)]
pub struct RodioSounder {
    sound: PathBuf,
}

impl RodioSounder {
    pub fn new(sound: PathBuf) -> Self {
        Self { sound }
    }
}

impl Sounder for RodioSounder {
    fn play_alert(&self) {
        let sound = self.sound.clone();
        let spawned = thread::Builder::new()
            .name("alert-sound".to_string())
            .spawn(move || {
                if let Err(e) = play_file(&sound) {
                    warn!(path = %sound.display(), error = %e, "Audio playback error");
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, "Failed to start sound thread");
        }
    }
}

#[derive(Debug, Default)]
pub struct SilentSounder;

impl Sounder for SilentSounder {
    fn play_alert(&self) {
        info!("Audio alert skipped: No sound loaded.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_sound_prefers_first_loadable() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.oga");
        let good = dir.path().join("bell.oga");
        fs::write(&broken, b"junk").unwrap();
        fs::write(&good, b"ogg").unwrap();

        let found = find_sound(
            vec![dir.path().join("missing.oga"), broken.clone(), good.clone()],
            |path| path != broken.as_path(),
        );
        assert_eq!(found, Some(good));
    }

    #[test]
    fn test_find_sound_skips_directories() {
        let dir = TempDir::new().unwrap();
        let found = find_sound(
            vec![dir.path().to_path_buf(), PathBuf::from("/no/such/sound.oga")],
            |_| true,
        );
        assert_eq!(found, None);
    }

    #[test]
    fn test_undecodable_file_is_not_loaded() {
        let dir = TempDir::new().unwrap();
        let junk = dir.path().join("junk.ogg");
        fs::write(&junk, b"definitely not audio").unwrap();

        assert!(matches!(decode(&junk), Err(SoundError::Decode(_))));
        assert_ne!(load_system_sound(Some(&junk)), Some(junk.clone()));
    }

    #[test]
    fn test_play_missing_file_fails_before_opening_output() {
        let err = play_file(Path::new("/no/such/sound.oga")).unwrap_err();
        assert!(matches!(err, SoundError::Io(_)));
    }

    #[test]
    fn test_play_alert_does_not_panic() {
        RodioSounder::new(PathBuf::from("/no/such/sound.oga")).play_alert();
        SilentSounder.play_alert();
    }
}
