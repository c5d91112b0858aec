//! Dispatch from the engine's content client to the settings bridge.

use std::rc::Rc;

use crate::context::BrowserContext;
use crate::engine::Session;
use crate::prefs::WebPreferences;
use crate::SettingsBridge;

/// Fills a session's preference record on the engine's request.
///
/// The engine's content client holds one of these instead of depending on
/// [`SettingsBridge`] directly.
pub trait WebPreferencesPopulater {
    fn populate_for(&self, session: &dyn Session, prefs: &mut WebPreferences);
}

/// Populater that forwards to the bridge attached to each session.
#[derive(Debug, Clone)]
pub struct SettingsPopulater {
    context: Rc<BrowserContext>,
}

impl SettingsPopulater {
    #[must_use]
    pub fn new(context: Rc<BrowserContext>) -> Self {
        Self { context }
    }
}

impl WebPreferencesPopulater for SettingsPopulater {
    fn populate_for(&self, session: &dyn Session, prefs: &mut WebPreferences) {
        match SettingsBridge::from_session(&self.context, session) {
            Some(bridge) => bridge.populate_web_preferences(prefs),
            None => tracing::debug!("No settings bridge for {}", session.id()),
        }
    }
}
