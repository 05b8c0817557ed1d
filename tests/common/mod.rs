use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use clap::Parser;
use gift_reveal::{AppState, Config};

/// App state counting towards `target`, with assets looked up in `assets`
pub fn state_with_target(target: DateTime<Utc>, assets: &Path) -> Arc<AppState> {
    build_state(target, assets, &[])
}

/// Same as `state_with_target`, playing the track through `player`
pub fn state_with_player(target: DateTime<Utc>, assets: &Path, player: &str) -> Arc<AppState> {
    build_state(target, assets, &["--player", player])
}

fn build_state(target: DateTime<Utc>, assets: &Path, extra: &[&str]) -> Arc<AppState> {
    let target = target.to_rfc3339();
    let audio = assets.join("birthday-song.mpeg").display().to_string();
    let portrait = assets.join("portrait.jpeg").display().to_string();

    let mut args = vec![
        "gift-reveal",
        "--target",
        target.as_str(),
        "--audio",
        audio.as_str(),
        "--portrait",
        portrait.as_str(),
        "--recipient",
        "Agnes",
    ];
    args.extend_from_slice(extra);

    let config = Config::try_parse_from(args).unwrap();
    Arc::new(AppState::new(&config))
}
