//! The host application's side of the settings bridge.
//!
//! A host settings object is owned by the embedding application and may be
//! destroyed at any point independently of the engine session it configures.
//! The bridge therefore only ever sees it through a [`HostHandle`], which must
//! be upgraded (and may fail to upgrade) before every read.

use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, SettingsBridge};

/// Smallest and largest font sizes a host may configure.
pub const MIN_FONT_SIZE: i32 = 1;
pub const MAX_FONT_SIZE: i32 = 72;

/// Page layout algorithm requested by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    Normal,
    SingleColumn,
    #[default]
    NarrowColumns,
    TextAutosizing,
}

/// Typed snapshot of every host field the bridge reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SettingsValues {
    pub allow_scripts_to_close_windows: bool,
    pub loads_images_automatically: bool,
    pub images_enabled: bool,
    pub javascript_enabled: bool,
    pub allow_universal_access_from_file_urls: bool,
    pub allow_file_access_from_file_urls: bool,
    pub javascript_can_open_windows_automatically: bool,
    pub support_multiple_windows: bool,
    pub dom_storage_enabled: bool,
    pub database_enabled: bool,
    pub use_wide_viewport: bool,
    pub load_with_overview_mode: bool,
    pub media_playback_requires_user_gesture: bool,
    pub default_video_poster_url: Option<String>,
    pub text_size_percent: i32,
    pub default_font_size: i32,
    pub default_fixed_font_size: i32,
    pub spatial_navigation_enabled: bool,
    pub quirks_mode_enabled: bool,
    pub support_zoom: bool,
    pub built_in_zoom_controls: bool,
    pub layout_algorithm: LayoutAlgorithm,
    pub app_cache_enabled: bool,
    pub app_cache_path: Option<String>,
    pub password_echo_enabled: bool,
    pub accept_languages: String,
    pub user_agent: Option<String>,
    pub initial_page_scale_percent: f32,
    pub dip_scale: f64,
    pub save_form_data: bool,
}

impl Default for SettingsValues {
    fn default() -> Self {
        Self {
            allow_scripts_to_close_windows: true,
            loads_images_automatically: true,
            images_enabled: true,
            javascript_enabled: true,
            allow_universal_access_from_file_urls: false,
            allow_file_access_from_file_urls: false,
            javascript_can_open_windows_automatically: true,
            support_multiple_windows: false,
            dom_storage_enabled: true,
            database_enabled: false,
            use_wide_viewport: false,
            load_with_overview_mode: false,
            media_playback_requires_user_gesture: true,
            default_video_poster_url: None,
            text_size_percent: 100,
            default_font_size: 16,
            default_fixed_font_size: 13,
            spatial_navigation_enabled: true,
            quirks_mode_enabled: false,
            support_zoom: true,
            built_in_zoom_controls: false,
            layout_algorithm: LayoutAlgorithm::NarrowColumns,
            app_cache_enabled: true,
            app_cache_path: None,
            password_echo_enabled: true,
            accept_languages: "en-US,en".to_string(),
            user_agent: None,
            initial_page_scale_percent: 0.0,
            dip_scale: 1.0,
            save_form_data: true,
        }
    }
}

impl SettingsValues {
    /// Application cache only works once a storage path has been configured.
    #[must_use]
    pub fn app_cache_effective(&self) -> bool {
        self.app_cache_enabled && self.app_cache_path.is_some()
    }

    #[must_use]
    pub fn supports_double_tap_zoom(&self) -> bool {
        self.support_zoom && self.built_in_zoom_controls && self.use_wide_viewport
    }

    #[must_use]
    pub fn text_autosizing_enabled(&self) -> bool {
        self.layout_algorithm == LayoutAlgorithm::TextAutosizing
    }

    /// Check that numeric fields are within the ranges the engine accepts.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSetting`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_font_size("default_font_size", self.default_font_size)?;
        check_font_size("default_fixed_font_size", self.default_fixed_font_size)?;

        if self.text_size_percent <= 0 {
            return Err(Error::InvalidSetting {
                field: "text_size_percent",
                reason: format!("must be positive, got {}", self.text_size_percent),
            });
        }
        if self.initial_page_scale_percent < 0.0 || !self.initial_page_scale_percent.is_finite() {
            return Err(Error::InvalidSetting {
                field: "initial_page_scale_percent",
                reason: format!(
                    "must be zero or a positive percentage, got {}",
                    self.initial_page_scale_percent
                ),
            });
        }
        if self.dip_scale <= 0.0 || !self.dip_scale.is_finite() {
            return Err(Error::InvalidSetting {
                field: "dip_scale",
                reason: format!("must be positive, got {}", self.dip_scale),
            });
        }
        Ok(())
    }
}

fn check_font_size(field: &'static str, size: i32) -> Result<()> {
    if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(Error::InvalidSetting {
            field,
            reason: format!("must be within {MIN_FONT_SIZE}..={MAX_FONT_SIZE}, got {size}"),
        })
    }
}

/// Clamp a font size into the range the engine accepts.
#[must_use]
pub fn clip_font_size(size: i32) -> i32 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Capability the host settings object exposes to the bridge.
///
/// Every method is read while the host holds its own settings lock; the
/// bridge performs no synchronization of its own. The computed getters
/// default to deriving their value from [`HostSettings::values`].
pub trait HostSettings {
    /// Current field values.
    fn values(&self) -> SettingsValues;

    fn app_cache_enabled(&self) -> bool {
        self.values().app_cache_effective()
    }

    fn password_echo_enabled(&self) -> bool {
        self.values().password_echo_enabled
    }

    fn supports_double_tap_zoom(&self) -> bool {
        self.values().supports_double_tap_zoom()
    }

    fn text_autosizing_enabled(&self) -> bool {
        self.values().text_autosizing_enabled()
    }

    fn accept_languages(&self) -> String {
        self.values().accept_languages
    }

    /// User agent override, or `None` to use the engine default.
    fn user_agent(&self) -> Option<String> {
        self.values().user_agent
    }

    fn initial_page_scale_percent(&self) -> f32 {
        self.values().initial_page_scale_percent
    }

    fn dip_scale(&self) -> f64 {
        self.values().dip_scale
    }

    fn save_form_data(&self) -> bool {
        self.values().save_form_data
    }

    /// Called once when a bridge reading this host is torn down.
    ///
    /// A host may be read by more than one bridge over its lifetime, so
    /// `bridge` identifies which one is going away.
    fn on_bridge_gone(&self, _bridge: &SettingsBridge) {}
}

/// Liveness-checked reference to a host settings object.
#[derive(Clone)]
pub struct HostHandle {
    host: Weak<dyn HostSettings>,
}

impl HostHandle {
    pub fn new<H: HostSettings + 'static>(host: &Rc<H>) -> Self {
        let host: Weak<H> = Rc::downgrade(host);
        Self { host }
    }

    /// Upgrade to a strong reference if the host is still alive.
    #[must_use]
    pub fn get(&self) -> Option<Rc<dyn HostSettings>> {
        self.host.upgrade()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.host.strong_count() > 0
    }
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(SettingsValues);

    impl HostSettings for Fixed {
        fn values(&self) -> SettingsValues {
            self.0.clone()
        }
    }

    #[test]
    fn test_settings_values_default_is_valid() {
        assert!(SettingsValues::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_font_size() {
        let values = SettingsValues {
            default_font_size: 0,
            ..SettingsValues::default()
        };
        let err = values.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting { field: "default_font_size", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_text_size() {
        let values = SettingsValues {
            text_size_percent: -5,
            ..SettingsValues::default()
        };
        assert!(matches!(
            values.validate(),
            Err(Error::InvalidSetting { field: "text_size_percent", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_dip_scale() {
        let values = SettingsValues {
            dip_scale: 0.0,
            ..SettingsValues::default()
        };
        assert!(matches!(
            values.validate(),
            Err(Error::InvalidSetting { field: "dip_scale", .. })
        ));
    }

    #[test]
    fn test_clip_font_size() {
        assert_eq!(clip_font_size(0), 1);
        assert_eq!(clip_font_size(16), 16);
        assert_eq!(clip_font_size(200), 72);
    }

    #[test]
    fn test_computed_getters() {
        let mut values = SettingsValues::default();
        assert!(!values.app_cache_effective());
        values.app_cache_path = Some("/tmp/appcache".to_string());
        assert!(values.app_cache_effective());

        assert!(!values.supports_double_tap_zoom());
        values.built_in_zoom_controls = true;
        values.use_wide_viewport = true;
        assert!(values.supports_double_tap_zoom());

        assert!(!values.text_autosizing_enabled());
        values.layout_algorithm = LayoutAlgorithm::TextAutosizing;
        assert!(values.text_autosizing_enabled());
    }

    #[test]
    fn test_trait_defaults_follow_values() {
        let host = Fixed(SettingsValues {
            user_agent: Some("Custom/1.0".to_string()),
            accept_languages: "fr-FR".to_string(),
            ..SettingsValues::default()
        });
        assert_eq!(host.user_agent().as_deref(), Some("Custom/1.0"));
        assert_eq!(host.accept_languages(), "fr-FR");
        assert!(host.save_form_data());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"text_size_percent":150,"layout_algorithm":"text_autosizing"}"#;
        let values: SettingsValues = serde_json::from_str(json).unwrap();
        assert_eq!(values.text_size_percent, 150);
        assert!(values.text_autosizing_enabled());
        assert_eq!(values.default_font_size, 16);
    }

    #[test]
    fn test_host_handle_liveness() {
        let host = Rc::new(Fixed(SettingsValues::default()));
        let handle = HostHandle::new(&host);
        assert!(handle.is_alive());
        assert!(handle.get().is_some());

        drop(host);
        assert!(!handle.is_alive());
        assert!(handle.get().is_none());
    }
}
