//! The engine-side preference record applied to a render view.

use serde::{Deserialize, Serialize};

/// Renderer-affecting preferences for one render view.
///
/// The engine owns instances of this record; the settings bridge only ever
/// writes into one it has been handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct WebPreferences {
    pub allow_scripts_to_close_windows: bool,
    pub images_enabled: bool,
    pub loads_images_automatically: bool,
    pub javascript_enabled: bool,
    pub allow_universal_access_from_file_urls: bool,
    pub allow_file_access_from_file_urls: bool,
    pub javascript_can_open_windows_automatically: bool,
    pub supports_multiple_windows: bool,
    pub application_cache_enabled: bool,
    pub local_storage_enabled: bool,
    pub databases_enabled: bool,
    pub initialize_at_minimum_page_scale: bool,
    pub use_wide_viewport: bool,
    pub double_tap_to_zoom_enabled: bool,
    pub user_gesture_required_for_media_playback: bool,
    pub password_echo_enabled: bool,
    pub spatial_navigation_enabled: bool,
    pub allow_running_insecure_content: bool,
    pub allow_displaying_insecure_content: bool,
    pub default_video_poster_url: Option<String>,
    pub text_autosizing_enabled: bool,
    pub font_scale_factor: f32,
    pub force_enable_zoom: bool,
    pub default_font_size: i32,
    pub default_fixed_font_size: i32,
    pub viewport_meta_non_user_scalable_quirk: bool,
    pub clobber_user_agent_initial_scale_quirk: bool,
    pub wide_viewport_quirk: bool,
    pub shrinks_standalone_images_to_fit: bool,
    pub should_clear_document_background: bool,
    pub viewport_meta_enabled: bool,
}

impl Default for WebPreferences {
    fn default() -> Self {
        Self {
            allow_scripts_to_close_windows: false,
            images_enabled: true,
            loads_images_automatically: true,
            javascript_enabled: true,
            allow_universal_access_from_file_urls: false,
            allow_file_access_from_file_urls: false,
            javascript_can_open_windows_automatically: false,
            supports_multiple_windows: true,
            application_cache_enabled: false,
            local_storage_enabled: false,
            databases_enabled: false,
            initialize_at_minimum_page_scale: true,
            use_wide_viewport: true,
            double_tap_to_zoom_enabled: true,
            user_gesture_required_for_media_playback: true,
            password_echo_enabled: false,
            spatial_navigation_enabled: false,
            allow_running_insecure_content: false,
            allow_displaying_insecure_content: true,
            default_video_poster_url: None,
            text_autosizing_enabled: true,
            font_scale_factor: 1.0,
            force_enable_zoom: false,
            default_font_size: 16,
            default_fixed_font_size: 13,
            viewport_meta_non_user_scalable_quirk: false,
            clobber_user_agent_initial_scale_quirk: false,
            wide_viewport_quirk: false,
            shrinks_standalone_images_to_fit: true,
            should_clear_document_background: true,
            viewport_meta_enabled: false,
        }
    }
}

impl WebPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values the embedded runtime pins regardless of host settings.
    pub fn apply_fixed(&mut self) {
        self.shrinks_standalone_images_to_fit = false;
        self.should_clear_document_background = false;
        self.viewport_meta_enabled = true;
    }
}
