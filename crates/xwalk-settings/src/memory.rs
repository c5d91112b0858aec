//! A host settings object living in the same process as the engine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::{clip_font_size, HostSettings, LayoutAlgorithm, SettingsValues};
use crate::{Result, SettingsBridge};

/// Which part of the engine state a setter invalidates.
#[derive(Debug, Clone, Copy)]
enum Resync {
    WebkitPreferences,
    UserAgent,
    InitialPageScale,
    FormData,
    AcceptLanguages,
    Everything,
}

/// Settings held in memory, re-synced to the attached bridge on every change.
///
/// Setters update the stored values, release the borrow, and then call the
/// matching `*_locked` bridge operation, so the bridge always reads the new
/// values.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: RefCell<SettingsValues>,
    bridge: RefCell<Option<Weak<SettingsBridge>>>,
}

impl InMemorySettings {
    #[must_use]
    pub fn new(values: SettingsValues) -> Self {
        Self {
            values: RefCell::new(values),
            bridge: RefCell::new(None),
        }
    }

    /// Load and validate settings from a JSON document.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns an error if the document is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let values: SettingsValues = serde_json::from_str(json)?;
        values.validate()?;
        Ok(Self::new(values))
    }

    /// Serialize the current values to JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.values.borrow())?)
    }

    /// Route future changes to `bridge`.
    pub fn attach_bridge(&self, bridge: &Rc<SettingsBridge>) {
        *self.bridge.borrow_mut() = Some(Rc::downgrade(bridge));
    }

    #[must_use]
    pub fn has_bridge(&self) -> bool {
        self.bridge
            .borrow()
            .as_ref()
            .is_some_and(|bridge| bridge.strong_count() > 0)
    }

    /// Replace every value at once.
    ///
    /// # Errors
    /// Returns an error, leaving the current values in place, if `values`
    /// fails validation.
    pub fn set_values(&self, values: SettingsValues) -> Result<()> {
        values.validate()?;
        self.update(Resync::Everything, |current| *current = values);
        Ok(())
    }

    pub fn set_javascript_enabled(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.javascript_enabled = enabled);
    }

    pub fn set_images_enabled(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.images_enabled = enabled);
    }

    pub fn set_loads_images_automatically(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.loads_images_automatically = enabled);
    }

    pub fn set_dom_storage_enabled(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.dom_storage_enabled = enabled);
    }

    pub fn set_database_enabled(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.database_enabled = enabled);
    }

    pub fn set_use_wide_viewport(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.use_wide_viewport = enabled);
    }

    pub fn set_quirks_mode_enabled(&self, enabled: bool) {
        self.update(Resync::WebkitPreferences, |v| v.quirks_mode_enabled = enabled);
    }

    pub fn set_layout_algorithm(&self, layout: LayoutAlgorithm) {
        self.update(Resync::WebkitPreferences, |v| v.layout_algorithm = layout);
    }

    /// Set the text size as a percentage of the default. Non-positive values
    /// are ignored.
    pub fn set_text_zoom(&self, percent: i32) {
        if percent <= 0 {
            tracing::warn!("Ignoring non-positive text zoom {}", percent);
            return;
        }
        self.update(Resync::WebkitPreferences, |v| v.text_size_percent = percent);
    }

    pub fn set_default_font_size(&self, size: i32) {
        let size = clip_font_size(size);
        self.update(Resync::WebkitPreferences, |v| v.default_font_size = size);
    }

    pub fn set_default_fixed_font_size(&self, size: i32) {
        let size = clip_font_size(size);
        self.update(Resync::WebkitPreferences, |v| v.default_fixed_font_size = size);
    }

    /// Override the user agent, or pass `None` (or an empty string) to restore
    /// the default.
    pub fn set_user_agent_string(&self, user_agent: Option<String>) {
        let user_agent = user_agent.filter(|ua| !ua.is_empty());
        self.update(Resync::UserAgent, |v| v.user_agent = user_agent);
    }

    /// Set the initial page scale percentage, or 0 for no override. Negative
    /// and non-finite values are ignored.
    pub fn set_initial_page_scale(&self, percent: f32) {
        if percent < 0.0 || !percent.is_finite() {
            tracing::warn!("Ignoring invalid initial page scale {}", percent);
            return;
        }
        self.update(Resync::InitialPageScale, |v| v.initial_page_scale_percent = percent);
    }

    pub fn set_save_form_data(&self, enabled: bool) {
        self.update(Resync::FormData, |v| v.save_form_data = enabled);
    }

    pub fn set_accept_languages(&self, languages: impl Into<String>) {
        let languages = languages.into();
        self.update(Resync::AcceptLanguages, |v| v.accept_languages = languages);
    }

    fn update<F>(&self, sync: Resync, apply: F)
    where
        F: FnOnce(&mut SettingsValues),
    {
        apply(&mut *self.values.borrow_mut());

        let bridge = self.bridge.borrow().as_ref().and_then(Weak::upgrade);
        let Some(bridge) = bridge else {
            return;
        };
        tracing::trace!("Syncing {:?} to {}", sync, bridge.session_id());
        match sync {
            Resync::WebkitPreferences => bridge.update_webkit_preferences_locked(),
            Resync::UserAgent => bridge.update_user_agent_locked(),
            Resync::InitialPageScale => bridge.update_initial_page_scale_locked(),
            Resync::FormData => bridge.update_form_data_preferences_locked(),
            Resync::AcceptLanguages => bridge.update_accept_languages_locked(),
            Resync::Everything => bridge.update_everything(),
        }
    }
}

impl HostSettings for InMemorySettings {
    fn values(&self) -> SettingsValues {
        self.values.borrow().clone()
    }

    fn on_bridge_gone(&self, bridge: &SettingsBridge) {
        let mut attached = self.bridge.borrow_mut();
        // Keep a newer bridge that replaced the one going away.
        let stale = attached.as_ref().is_some_and(|current| {
            current.strong_count() == 0 || std::ptr::eq(current.as_ptr(), bridge)
        });
        if stale {
            tracing::debug!("Settings bridge for {} detached from host settings", bridge.session_id());
            *attached = None;
        }
    }
}
