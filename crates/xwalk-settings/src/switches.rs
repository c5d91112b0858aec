//! Process-wide runtime switches that feed into preference population.

use crate::{Error, Result};

pub const ALLOW_RUNNING_INSECURE_CONTENT: &str = "allow-running-insecure-content";
pub const NO_DISPLAYING_INSECURE_CONTENT: &str = "no-displaying-insecure-content";

/// Switches normally read from the runtime's command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeSwitches {
    pub allow_running_insecure_content: bool,
    pub no_displaying_insecure_content: bool,
}

impl RuntimeSwitches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_allow_running_insecure_content(mut self, enabled: bool) -> Self {
        self.allow_running_insecure_content = enabled;
        self
    }

    #[must_use]
    pub fn with_no_displaying_insecure_content(mut self, enabled: bool) -> Self {
        self.no_displaying_insecure_content = enabled;
        self
    }

    /// Parse switches from command line arguments, skipping anything unrecognised.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut switches = Self::new();
        for arg in args {
            if !switches.apply(arg.as_ref()) {
                tracing::trace!("Ignoring argument {:?}", arg.as_ref());
            }
        }
        switches
    }

    /// Parse switches, rejecting any `--` switch this runtime does not know.
    ///
    /// Positional arguments are still skipped.
    ///
    /// # Errors
    /// Returns [`Error::UnknownSwitch`] for the first unrecognised switch.
    pub fn from_args_strict<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut switches = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            if !switches.apply(arg) && arg.starts_with("--") {
                return Err(Error::UnknownSwitch(arg.to_string()));
            }
        }
        Ok(switches)
    }

    fn apply(&mut self, arg: &str) -> bool {
        let Some(name) = arg.strip_prefix("--") else {
            return false;
        };
        // Chromium-style switches may carry a value; only the name matters here.
        let name = name.split_once('=').map_or(name, |(name, _)| name);
        match name {
            ALLOW_RUNNING_INSECURE_CONTENT => self.allow_running_insecure_content = true,
            NO_DISPLAYING_INSECURE_CONTENT => self.no_displaying_insecure_content = true,
            _ => return false,
        }
        true
    }
}
