use std::env;

/// Runtime configuration, loaded from environment variables and then
/// overridden by command-line flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub firehose_url: String,
    pub api_url: String,
    pub token: Option<String>,
    pub user: String,
    pub feed: String,
    pub trigger: usize,
    pub reconnect: bool,
    pub save: bool,
    pub checkpoint_path: String,
    pub verbose: bool,
    pub debug: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let firehose_url = env::var("FIREHOSE_URL")
            .map_err(|_| ConfigError::MissingVariable("FIREHOSE_URL".to_string()))?;

        if !firehose_url.starts_with("ws://") && !firehose_url.starts_with("wss://") {
            return Err(ConfigError::InvalidValue(
                "FIREHOSE_URL must start with ws:// or wss://".to_string(),
            ));
        }

        let api_url = env::var("API_URL")
            .map_err(|_| ConfigError::MissingVariable("API_URL".to_string()))?;

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "API_URL must start with http:// or https://".to_string(),
            ));
        }

        let token = env::var("API_TOKEN").ok();

        let user = env::var("CORRELATOR_USER").unwrap_or_default();
        let feed = env::var("CORRELATOR_FEED").unwrap_or_default();

        let trigger = env::var("CORRELATOR_TRIGGER")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(3);

        let checkpoint_path =
            env::var("CHECKPOINT_PATH").unwrap_or_else(|_| "correlator.json".to_string());

        Ok(Self {
            firehose_url,
            api_url,
            token,
            user,
            feed,
            trigger,
            reconnect: false,
            save: false,
            checkpoint_path,
            verbose: false,
            debug: false,
        })
    }

    /// Apply command-line flags on top of the environment-derived config.
    ///
    /// Recognized: `--user <name>`, `--feed <name>`, `--trigger <n>`,
    /// `-r`/`--reconnect`, `-s`/`--save`, `-v`/`--verbose`, `-d`/`--debug`.
    pub fn apply_cli_args(&mut self, args: &[String]) {
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--user" => {
                    if let Some(value) = args.get(i + 1) {
                        self.user = value.clone();
                        i += 1;
                    }
                }
                "--feed" => {
                    if let Some(value) = args.get(i + 1) {
                        self.feed = value.clone();
                        i += 1;
                    }
                }
                "--trigger" => {
                    if let Some(value) = args.get(i + 1).and_then(|s| s.parse::<usize>().ok()) {
                        self.trigger = value;
                        i += 1;
                    }
                }
                "-r" | "--reconnect" => self.reconnect = true,
                "-s" | "--save" => self.save = true,
                "-v" | "--verbose" => self.verbose = true,
                "-d" | "--debug" => self.debug = true,
                _ => {}
            }
            i += 1;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user.is_empty() {
            return Err(ConfigError::MissingVariable(
                "CORRELATOR_USER (or --user)".to_string(),
            ));
        }

        if self.feed.is_empty() {
            return Err(ConfigError::MissingVariable(
                "CORRELATOR_FEED (or --feed)".to_string(),
            ));
        }

        if self.trigger == 0 {
            return Err(ConfigError::InvalidValue(
                "trigger threshold must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Local submission identity, used to drop our own events off the feed.
    pub fn origin(&self) -> String {
        format!("{}/{}", self.user, self.feed)
    }

    /// Default log filter derived from the verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            firehose_url: "wss://feeds.example.com/firehose".to_string(),
            api_url: "https://api.example.com".to_string(),
            token: None,
            user: "wes".to_string(),
            feed: "correlated".to_string(),
            trigger: 3,
            reconnect: false,
            save: false,
            checkpoint_path: "correlator.json".to_string(),
            verbose: false,
            debug: false,
        }
    }

    #[test]
    fn test_cli_args_override_env() {
        let mut config = base_config();
        let args: Vec<String> = [
            "--user", "alice", "--feed", "observed", "--trigger", "5", "-r", "-s", "-v",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        config.apply_cli_args(&args);

        assert_eq!(config.user, "alice");
        assert_eq!(config.feed, "observed");
        assert_eq!(config.trigger, 5);
        assert!(config.reconnect);
        assert!(config.save);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_validate_requires_identity() {
        let mut config = base_config();
        config.user.clear();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.feed.clear();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.trigger = 0;
        assert!(config.validate().is_err());

        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_origin_format() {
        let config = base_config();
        assert_eq!(config.origin(), "wes/correlated");
    }
}
