//! Text-to-speech via whatever engine the host provides.
//!
//! Probed once at startup. Speech runs fire-and-forget in a spawned
//! process so a slow or wedged engine can never stall a request.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A speech engine found on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsEngine {
    /// macOS `say` with a Japanese voice
    Say,
    /// espeak-ng with the Japanese voice
    EspeakNg,
    /// classic espeak, same flags as espeak-ng
    Espeak,
}

impl TtsEngine {
    fn command(&self) -> &'static str {
        match self {
            TtsEngine::Say => "say",
            TtsEngine::EspeakNg => "espeak-ng",
            TtsEngine::Espeak => "espeak",
        }
    }

    pub fn name(&self) -> &'static str {
        self.command()
    }
}

/// Probe PATH for a usable speech engine, preferring espeak-ng over
/// classic espeak.
pub fn detect_engine() -> Option<TtsEngine> {
    for engine in [TtsEngine::Say, TtsEngine::EspeakNg, TtsEngine::Espeak] {
        if find_in_path(engine.command()).is_some() {
            tracing::info!("Speech engine: {}", engine.name());
            return Some(engine);
        }
    }
    tracing::info!("No speech engine found, audio disabled");
    None
}

fn find_in_path(binary: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Speak Japanese text without waiting for the engine to finish.
pub fn speak(engine: TtsEngine, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }

    let mut cmd = Command::new(engine.command());
    match engine {
        TtsEngine::Say => {
            cmd.args(["-v", "Kyoko"]).arg(text);
        }
        TtsEngine::EspeakNg | TtsEngine::Espeak => {
            cmd.args(["-v", "ja"]).arg(text);
        }
    }

    let spawned = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(_child) => {
            tracing::debug!("Speaking via {}: {}", engine.name(), text);
        }
        Err(e) => {
            tracing::warn!("Speech engine {} failed to start: {}", engine.name(), e);
        }
    }
}
