use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_MAX: u32 = 10;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub ytdlp_path: PathBuf,
    pub ytdlp_extra_args: Vec<String>,
    pub static_dir: PathBuf,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub trust_proxy_headers: bool,
    pub simple_mode: bool
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT),
            ytdlp_path: get("YTDLP_PATH").map_or_else(|| PathBuf::from("yt-dlp"), PathBuf::from),
            ytdlp_extra_args: get("YTDLP_EXTRACTOR_ARGS")
                .map(|args| parse_extractor_args(&args))
                .unwrap_or_default(),
            static_dir: get("STATIC_DIR").map_or_else(|| PathBuf::from("public"), PathBuf::from),
            rate_limit_max: parse_or("RATE_LIMIT_MAX", get("RATE_LIMIT_MAX"), DEFAULT_RATE_LIMIT_MAX),
            rate_limit_window: Duration::from_secs(parse_or(
                "RATE_LIMIT_WINDOW_SECS",
                get("RATE_LIMIT_WINDOW_SECS"),
                DEFAULT_RATE_LIMIT_WINDOW_SECS
            )),
            trust_proxy_headers: read_bool("TRUST_PROXY_HEADERS", get("TRUST_PROXY_HEADERS")),
            simple_mode: read_bool("SIMPLE_MODE", get("SIMPLE_MODE"))
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_or<T: FromStr + Copy>(name: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid value {:?} for {}, using default", raw, name);
            default
        }),
        None => default
    }
}

fn read_bool(name: &str, value: Option<String>) -> bool {
    let Some(raw) = value else {
        return false;
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!("invalid boolean {:?} for {}, using false", raw, name);
            false
        }
    }
}

/// Folds newline- or semicolon-separated extractor args into a single
/// `--extractor-args` pair.
pub fn parse_extractor_args(input: &str) -> Vec<String> {
    let joined: Vec<&str> = input
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if joined.is_empty() {
        return Vec::new();
    }
    vec![
        "--extractor-args".to_string(),
        joined.join(";")
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.ytdlp_path, PathBuf::from("yt-dlp"));
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.rate_limit_max, 10);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
        assert!(!config.trust_proxy_headers);
        assert!(!config.simple_mode);
        assert!(config.ytdlp_extra_args.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("BIND_ADDRESS", "127.0.0.1"),
            ("YTDLP_PATH", "/opt/bin/yt-dlp"),
            ("RATE_LIMIT_MAX", "3"),
            ("RATE_LIMIT_WINDOW_SECS", "5"),
            ("TRUST_PROXY_HEADERS", "yes"),
            ("SIMPLE_MODE", "1")
        ]);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.ytdlp_path, PathBuf::from("/opt/bin/yt-dlp"));
        assert_eq!(config.rate_limit_max, 3);
        assert_eq!(config.rate_limit_window, Duration::from_secs(5));
        assert!(config.trust_proxy_headers);
        assert!(config.simple_mode);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("RATE_LIMIT_MAX", "-1"),
            ("SIMPLE_MODE", "maybe"),
            ("STATIC_DIR", "   ")
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit_max, 10);
        assert!(!config.simple_mode);
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_parse_extractor_args_basic() {
        let input = "youtube:player-client=default,mweb\nyoutubepot-bgutilhttp:base_url=http://bgutil:4416";
        let result = parse_extractor_args(input);
        assert_eq!(result, vec![
            "--extractor-args",
            "youtube:player-client=default,mweb;youtubepot-bgutilhttp:base_url=http://bgutil:4416"
        ]);
    }

    #[test]
    fn test_parse_extractor_args_empty() {
        assert!(parse_extractor_args("").is_empty());
        assert!(parse_extractor_args("  \n ; \n  ").is_empty());
    }

    #[test]
    fn test_parse_extractor_args_from_env() {
        let config = config_from(&[("YTDLP_EXTRACTOR_ARGS", "youtube:player-client=mweb; youtube:po_token=abc")]);
        assert_eq!(config.ytdlp_extra_args, vec![
            "--extractor-args",
            "youtube:player-client=mweb;youtube:po_token=abc"
        ]);
    }
}
