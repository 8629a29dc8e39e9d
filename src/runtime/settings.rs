use crate::config;

/// Load settings, falling back to defaults on any problem. The second value
/// describes why defaults were used; it is logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (config::Settings::default(), Some(format!("invalid config: {msg}"))),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config: {e}")),
        ),
    }
}
