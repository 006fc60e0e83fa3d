pub mod settings;

pub use settings::{
    KeyStrategy, LoggingConfig, Provider, RoutingConfig, ServerConfig, Settings, SettingsSaver,
};
