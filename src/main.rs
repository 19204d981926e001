use std::process;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use scene_player::{
    playback::Playback,
    player::{config::PlayerConfig, Player},
    store::FragmentStore,
    types::SceneScript,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "scene-player play <script.json> [--interval <ms>]";
const CHECK_USAGE: &str = "scene-player check <script.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => {
            let (path, interval) = play_args(args)?;
            let mut config = PlayerConfig::load();
            if let Some(ms) = interval {
                config.reveal_interval_ms = ms;
            }
            play(&path, config)
        }
        Some("check") => {
            let path = args.next().context(CHECK_USAGE)?;
            check(&path, &PlayerConfig::load())
        }
        _ => bail!(
            "Scene Player — terminal visual novel player\n\nUsage:\n  {PLAY_USAGE}\n  {CHECK_USAGE}"
        ),
    }
}

/// Parse `<script.json> [--interval <ms>]`, rejecting anything else.
fn play_args(mut args: impl Iterator<Item = String>) -> Result<(String, Option<u64>)> {
    let path = args.next().context(PLAY_USAGE)?;
    let interval = match (args.next().as_deref(), args.next()) {
        (None, _) => None,
        (Some("--interval"), Some(ms)) => Some(
            ms.parse()
                .with_context(|| format!("Invalid interval {ms:?}"))?,
        ),
        _ => bail!("Usage: {PLAY_USAGE}"),
    };
    if args.next().is_some() {
        bail!("Usage: {PLAY_USAGE}");
    }
    Ok((path, interval))
}

fn load(path: &str, config: &PlayerConfig) -> Result<SceneScript> {
    let script = SceneScript::load(path).with_context(|| format!("Failed to load {path}"))?;
    script
        .validate(&config.registry())
        .with_context(|| format!("Invalid script {path}"))?;
    Ok(script)
}

fn check(path: &str, config: &PlayerConfig) -> Result<()> {
    let script = load(path, config)?;
    let transitions = script.line_count().saturating_sub(1);
    let reveal_ms: u64 = script
        .screens
        .iter()
        .flat_map(|s| &s.text)
        .map(|line| line.chars().count() as u64 * config.reveal_interval_ms)
        .sum();

    eprintln!(
        "{path}: {} screens, {} lines, {transitions} transitions, ~{:.1}s of typing",
        script.screens.len(),
        script.line_count(),
        Duration::from_millis(reveal_ms).as_secs_f64(),
    );
    Ok(())
}

fn play(path: &str, config: PlayerConfig) -> Result<()> {
    let script = load(path, &config)?;
    let scene = script.title.clone().unwrap_or_else(|| path.to_string());
    let playback = Playback::new(script, config.interval(), Instant::now())?;

    let mut player = Player::new(playback, FragmentStore::new(scene), config);
    player.play()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|a| a.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn play_args_accepts_path_and_interval() {
        let (path, interval) = play_args(args(&["chapter1.json"])).unwrap();
        assert_eq!(path, "chapter1.json");
        assert_eq!(interval, None);

        let (_, interval) = play_args(args(&["chapter1.json", "--interval", "30"])).unwrap();
        assert_eq!(interval, Some(30));
    }

    #[test]
    fn play_args_rejects_trailing_arguments() {
        assert!(play_args(args(&["chapter1.json", "--interval", "30", "extra"])).is_err());
        assert!(play_args(args(&["chapter1.json", "--speed", "30"])).is_err());
        assert!(play_args(args(&["chapter1.json", "--interval", "fast"])).is_err());
        assert!(play_args(args(&[])).is_err());
    }
}
