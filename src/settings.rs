//! Process-wide settings from the environment.

use anyhow::Result;
use ahtml_html::env::get_env_bool;
use crate::warn::set_trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// `ACOMPONENTS_TRACE`: report render walk steps on stderr.
    pub trace: bool,
    /// `HTML_META_DEBUG`: report how the HTML meta db was loaded.
    pub html_meta_debug: bool,
}

impl Settings {
    pub fn from_env() -> Result<Settings> {
        Ok(Settings {
            trace: get_env_bool("ACOMPONENTS_TRACE")?,
            html_meta_debug: get_env_bool("HTML_META_DEBUG")?,
        })
    }

    /// Make the settings take effect.
    pub fn apply(&self) {
        set_trace(self.trace);
    }
}

/// Read the settings and apply them; unparseable values are errors.
pub fn init_from_env() -> Result<Settings> {
    let settings = Settings::from_env()?;
    settings.apply();
    Ok(settings)
}
