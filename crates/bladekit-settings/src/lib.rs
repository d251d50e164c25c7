//! Bladekit Settings Crate
//!
//! Post-processor configuration: machine heights and park position, G-code
//! output policy (axes, modal A step, retract-on-turn, spindle), and the
//! blade-orientation parameters. Handles validation and TOML/JSON
//! persistence in the platform config directory.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{AngleSettings, Config, GcodeSettings, MachineSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::default_config_path;
