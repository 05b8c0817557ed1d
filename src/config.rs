//! Configuration and CLI argument handling

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "gift-reveal")]
#[command(about = "A countdown that turns into a gift reveal greeting card")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20614")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Celebrated instant, RFC 3339 or a local date-time like 2026-02-16T00:00:00
    #[arg(short, long, default_value = "2026-02-16T00:00:00", value_parser = parse_target)]
    pub target: DateTime<Utc>,

    /// Name shown on the gift and the card
    #[arg(short, long, default_value = "Agnes Jebarani")]
    pub recipient: String,

    /// Looped background track
    #[arg(long, default_value = "assets/birthday-song.mpeg")]
    pub audio: PathBuf,

    /// Portrait shown on the opened card
    #[arg(long, default_value = "assets/portrait.jpeg")]
    pub portrait: PathBuf,

    /// Play the track through an external player (e.g. "mpv --loop=inf --no-video")
    /// instead of the page's audio element
    #[arg(long)]
    pub player: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Split the player command line into program and leading arguments
    pub fn player_command(&self) -> Option<(String, Vec<String>)> {
        let mut parts = self.player.as_deref()?.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

/// Accept either an RFC 3339 timestamp or a naive date-time in the local zone
pub fn parse_target(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| format!("invalid target '{}': {}", raw, e))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("target '{}' does not exist in the local time zone", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_target_keeps_its_offset() {
        let target = parse_target("2026-02-16T00:00:00+05:30").unwrap();
        assert_eq!(target.to_rfc3339(), "2026-02-15T18:30:00+00:00");
    }

    #[test]
    fn naive_target_is_local_time() {
        let target = parse_target("2026-02-16T00:00:00").unwrap();
        let expected = Local
            .with_ymd_and_hms(2026, 2, 16, 0, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(target, expected);
    }

    #[test]
    fn garbage_target_is_rejected() {
        assert!(parse_target("next tuesday").is_err());
    }

    #[test]
    fn defaults_parse() {
        let config = Config::try_parse_from(["gift-reveal"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20614");
        assert_eq!(config.log_level(), "info");
        assert!(config.player_command().is_none());
    }

    #[test]
    fn player_command_splits_arguments() {
        let config = Config::try_parse_from([
            "gift-reveal",
            "--player",
            "mpv --loop=inf --no-video",
        ])
        .unwrap();
        let (program, args) = config.player_command().unwrap();
        assert_eq!(program, "mpv");
        assert_eq!(args, vec!["--loop=inf", "--no-video"]);
    }
}
