use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Realtime Database REST root (e.g. https://<db>.firebaseio.com)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Total length of one wheel spin in milliseconds
    #[serde(default = "default_spin_duration_ms")]
    pub spin_duration_ms: u64,

    /// Lower bound on the number of filler ticks per spin
    #[serde(default = "default_min_ticks")]
    pub min_ticks: usize,

    /// How far ahead of its anchor tick the acceleration sound starts
    #[serde(default = "default_audio_lead_in_ms")]
    pub audio_lead_in_ms: u64,

    /// Position of the audio anchor tick as a fraction of the tick count
    #[serde(default = "default_audio_trigger_fraction")]
    pub audio_trigger_fraction: f64,
}

fn default_database_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_spin_duration_ms() -> u64 {
    20_000
}

fn default_min_ticks() -> usize {
    28
}

fn default_audio_lead_in_ms() -> u64 {
    150
}

fn default_audio_trigger_fraction() -> f64 {
    0.12
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Wheel timing settings
    pub fn wheel(&self) -> WheelConfig {
        WheelConfig {
            spin_duration: Duration::from_millis(self.spin_duration_ms),
            min_ticks: self.min_ticks,
            audio_lead_in: Duration::from_millis(self.audio_lead_in_ms),
            audio_trigger_fraction: self.audio_trigger_fraction,
        }
    }
}

/// Timing constants used by the decision wheel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    pub spin_duration: Duration,
    pub min_ticks: usize,
    pub audio_lead_in: Duration,
    pub audio_trigger_fraction: f64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration: Duration::from_millis(default_spin_duration_ms()),
            min_ticks: default_min_ticks(),
            audio_lead_in: Duration::from_millis(default_audio_lead_in_ms()),
            audio_trigger_fraction: default_audio_trigger_fraction(),
        }
    }
}
