use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

use crate::theme::Theme;

/// Farmstand - terminal storefront for the agricultural marketplace
///
/// Browse listings, manage a cart, and run the payments dashboard against
/// the marketplace backend. Configuration priority: CLI args > environment
/// variables > defaults.
#[derive(Parser, Debug)]
#[command(name = "farmstand")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal storefront for the agricultural marketplace", long_about = None)]
pub struct CliArgs {
    /// Marketplace API base URL
    #[arg(long, env = "FARMSTAND_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds (1000-60000)
    #[arg(long, env = "FARMSTAND_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Available FPS options for Ctrl+O cycling (comma-separated, e.g. "20,30,60")
    #[arg(long, env = "RENDER_FPS_CHOICES")]
    pub render_fps_choices: Option<String>,

    /// Color theme: orchard, nord, amber-crt, green-phosphor
    #[arg(long, env = "FARMSTAND_THEME")]
    pub theme: Option<String>,

    /// Path to the session file (access token + last order id)
    #[arg(long, env = "FARMSTAND_SESSION_PATH")]
    pub session_path: Option<PathBuf>,

    /// Serve the built-in sample datasets instead of the network
    #[arg(long, env = "FARMSTAND_DEMO")]
    pub demo: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub timeout_ms: u64,
    pub render_fps: u32,
    pub render_fps_choices: Vec<u32>,
    pub theme: Theme,
    pub session_path: PathBuf,
    pub demo: bool,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Parse comma-separated FPS list and validate each value
fn parse_fps_list(s: &str) -> Vec<u32> {
    s.split(',')
        .filter_map(|v| v.trim().parse::<u32>().ok())
        .filter(|n| (1..=120).contains(n))
        .collect()
}

/// Basic scheme check on the API base URL
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables.
/// Priority: CLI args > environment variables > defaults.
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .or_else(|| env::var("FARMSTAND_API_URL").ok())
        .unwrap_or_else(|| "https://api.agromarket.example/v1".to_string());
    validate_url(&api_url, "FARMSTAND_API_URL")?;

    let timeout_ms = args
        .timeout_ms
        .or_else(|| env::var("FARMSTAND_TIMEOUT_MS").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(8000);
    let timeout_ms = validate_in_range(timeout_ms, 1000, 60000, "FARMSTAND_TIMEOUT_MS")?;

    let render_fps_choices = args
        .render_fps_choices
        .or_else(|| env::var("RENDER_FPS_CHOICES").ok())
        .map(|s| parse_fps_list(&s))
        .unwrap_or_else(|| vec![20, 30, 60]);
    if render_fps_choices.is_empty() {
        return Err(anyhow!(
            "RENDER_FPS_CHOICES must contain at least one valid value (1-120)"
        ));
    }

    let default_fps = *render_fps_choices.first().unwrap();
    let render_fps = args
        .render_fps
        .or_else(|| env::var("RENDER_FPS").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(default_fps);
    let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

    let theme = match args.theme.or_else(|| env::var("FARMSTAND_THEME").ok()) {
        Some(name) => Theme::from_name(&name).map_err(|e| anyhow!(e))?,
        None => Theme::default(),
    };

    let session_path = args
        .session_path
        .unwrap_or_else(crate::session::default_path);

    Ok(Config {
        api_url,
        timeout_ms,
        render_fps,
        render_fps_choices,
        theme,
        session_path,
        demo: args.demo || env::var("FARMSTAND_DEMO").map(|v| v == "1" || v == "true").unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_validation_bounds_are_inclusive() {
        assert!(validate_in_range(1000, 1000, 60000, "t").is_ok());
        assert!(validate_in_range(60000, 1000, 60000, "t").is_ok());
        assert!(validate_in_range(999, 1000, 60000, "t").is_err());
    }

    #[test]
    fn fps_list_drops_garbage_and_out_of_range() {
        assert_eq!(parse_fps_list("20, 30,60"), vec![20, 30, 60]);
        assert_eq!(parse_fps_list("0,200,abc,45"), vec![45]);
        assert!(parse_fps_list("").is_empty());
    }

    #[test]
    fn url_scheme_is_enforced() {
        assert!(validate_url("https://api.example.com/v1", "u").is_ok());
        assert!(validate_url("http://127.0.0.1:8340", "u").is_ok());
        assert!(validate_url("ftp://api.example.com", "u").is_err());
        assert!(validate_url("", "u").is_err());
    }
}
