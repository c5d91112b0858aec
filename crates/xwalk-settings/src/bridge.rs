//! Per-session bridge copying host settings into engine preferences.
//!
//! Every operation first checks that both the session and the host settings
//! object are still alive. When either is gone the operation returns without
//! touching anything.
//!
//! ## Locking
//!
//! Methods whose names end in `_locked` read host fields directly and must
//! only be called while the caller holds the host settings lock, typically
//! from inside a host setter. The unlocked entry points
//! ([`SettingsBridge::update_everything`],
//! [`SettingsBridge::populate_web_preferences`]) are meant for engine-side
//! callers and read the host through its own synchronized getters.

use std::rc::{Rc, Weak};

use crate::context::BrowserContext;
use crate::engine::{
    RenderViewHostExt, Session, SessionId, SessionObserver, ACCEPT_LANGUAGES_PREF,
};
use crate::host::{HostHandle, HostSettings};
use crate::prefs::WebPreferences;

/// Text size at or above which pinch zoom is forced on while autosizing.
pub const FORCE_ZOOM_TEXT_SIZE_PERCENT: i32 = 130;

/// Initial page scale passed to the engine when the host sets none.
pub const NO_INITIAL_PAGE_SCALE: f32 = -1.0;

/// User agent the runtime reports when the host does not override it.
#[must_use]
pub fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (Linux; Android) AppleWebKit/537.36 (KHTML, like Gecko) \
         Crosswalk/{} Mobile Safari/537.36",
        env!("CARGO_PKG_VERSION")
    )
}

/// Zoom behaviour derived from the host's text size percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextZoom {
    /// Factor handed to the render view extension.
    pub text_zoom_factor: f32,
    /// Font scale for the autosizer, only set while autosizing is on.
    pub font_scale_factor: Option<f32>,
    pub force_enable_zoom: bool,
}

impl TextZoom {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_percent(text_size_percent: i32, autosizing: bool) -> Self {
        let scale = text_size_percent as f32 / 100.0;
        if autosizing {
            // The autosizer does the scaling, so the page zoom stays at 100%.
            Self {
                text_zoom_factor: 1.0,
                font_scale_factor: Some(scale),
                force_enable_zoom: text_size_percent >= FORCE_ZOOM_TEXT_SIZE_PERCENT,
            }
        } else {
            Self {
                text_zoom_factor: scale,
                font_scale_factor: None,
                force_enable_zoom: false,
            }
        }
    }
}

/// Map a host initial page scale percentage to the engine's scale.
///
/// Zero means "no override" and maps to [`NO_INITIAL_PAGE_SCALE`] whatever
/// the DIP scale is.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn initial_page_scale(percent: f32, dip_scale: f64) -> f32 {
    if percent == 0.0 {
        return NO_INITIAL_PAGE_SCALE;
    }
    percent / dip_scale as f32 / 100.0
}

/// Bridge between one session and the host settings object configuring it.
pub struct SettingsBridge {
    context: Rc<BrowserContext>,
    session_id: SessionId,
    session: Weak<dyn Session>,
    host: HostHandle,
}

impl SettingsBridge {
    /// Create the bridge for `session` and attach it to the session in
    /// `context`, replacing any previous association.
    pub fn new<S: Session + 'static>(
        context: &Rc<BrowserContext>,
        session: &Rc<S>,
        host: HostHandle,
    ) -> Rc<Self> {
        let session_id = session.id();
        let weak_session: Weak<S> = Rc::downgrade(session);
        let bridge = Rc::new(Self {
            context: Rc::clone(context),
            session_id,
            session: weak_session,
            host,
        });
        context.register(session_id, &bridge);
        tracing::debug!("Attached settings bridge to {}", session_id);
        bridge
    }

    /// Look up the bridge attached to `session`.
    #[must_use]
    pub fn from_session(context: &BrowserContext, session: &dyn Session) -> Option<Rc<Self>> {
        context.settings_for(session.id())
    }

    /// Host-initiated teardown.
    pub fn destroy(self: Rc<Self>) {
        tracing::debug!("Destroying settings bridge for {}", self.session_id);
        drop(self);
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    fn session(&self) -> Option<Rc<dyn Session>> {
        let session = self.session.upgrade();
        if session.is_none() {
            tracing::debug!("{} is gone, skipping settings update", self.session_id);
        }
        session
    }

    fn live_host(&self) -> Option<Rc<dyn HostSettings>> {
        let host = self.host.get();
        if host.is_none() {
            tracing::debug!(
                "Host settings for {} are gone, skipping settings update",
                self.session_id
            );
        }
        host
    }

    fn render_view_host_ext(&self) -> Option<Rc<dyn RenderViewHostExt>> {
        self.session()?.render_view_host_ext()
    }

    /// Push every host setting to the engine: initial page scale, web
    /// preferences, user agent and form data saving, in that order.
    pub fn update_everything(&self) {
        let Some(host) = self.live_host() else {
            return;
        };
        self.update_everything_with(host.as_ref());
    }

    fn update_everything_with(&self, host: &dyn HostSettings) {
        self.update_initial_page_scale_with(host);
        self.update_webkit_preferences_with();
        self.update_user_agent_with(host);
        self.update_form_data_preferences_with(host);
    }

    /// Apply the host's initial page scale. Requires the host settings lock.
    pub fn update_initial_page_scale_locked(&self) {
        if let Some(host) = self.live_host() {
            self.update_initial_page_scale_with(host.as_ref());
        }
    }

    fn update_initial_page_scale_with(&self, host: &dyn HostSettings) {
        let Some(ext) = self.render_view_host_ext() else {
            return;
        };
        let scale = initial_page_scale(host.initial_page_scale_percent(), host.dip_scale());
        tracing::debug!("Setting initial page scale for {} to {}", self.session_id, scale);
        ext.set_initial_page_scale(scale);
    }

    /// Ask the engine to re-apply preferences. Requires the host settings lock.
    pub fn update_webkit_preferences_locked(&self) {
        if self.live_host().is_some() {
            self.update_webkit_preferences_with();
        }
    }

    fn update_webkit_preferences_with(&self) {
        let Some(session) = self.session() else {
            return;
        };
        if session.render_view_host_ext().is_none() {
            return;
        }
        let Some(render_view_host) = session.render_view_host() else {
            return;
        };
        tracing::debug!("Re-applying web preferences for {}", self.session_id);
        render_view_host.on_webkit_preferences_changed();
    }

    /// Apply the host's user agent override. Requires the host settings lock.
    pub fn update_user_agent_locked(&self) {
        if let Some(host) = self.live_host() {
            self.update_user_agent_with(host.as_ref());
        }
    }

    fn update_user_agent_with(&self, host: &dyn HostSettings) {
        let Some(session) = self.session() else {
            return;
        };
        let user_agent = host.user_agent();
        let overridden = user_agent.is_some();
        if let Some(user_agent) = user_agent {
            tracing::debug!("Overriding user agent for {}", self.session_id);
            session.set_user_agent_override(&user_agent);
        }
        for index in 0..session.navigation_entry_count() {
            session.set_entry_overriding_user_agent(index, overridden);
        }
    }

    /// Forward the host's save-form-data flag to the session's autofill
    /// client. Requires the host settings lock.
    pub fn update_form_data_preferences_locked(&self) {
        if let Some(host) = self.live_host() {
            self.update_form_data_preferences_with(host.as_ref());
        }
    }

    fn update_form_data_preferences_with(&self, host: &dyn HostSettings) {
        let Some(autofill) = self.session().and_then(|session| session.autofill_client()) else {
            return;
        };
        autofill.set_save_form_data(host.save_form_data());
    }

    /// Store the host's accept-languages list in the preference service.
    /// Requires the host settings lock.
    pub fn update_accept_languages_locked(&self) {
        let Some(host) = self.live_host() else {
            return;
        };
        let Some(prefs) = self.context.pref_service() else {
            return;
        };
        let languages = host.accept_languages();
        tracing::debug!("Setting accept languages to {:?}", languages);
        prefs.set_string(ACCEPT_LANGUAGES_PREF, &languages);
    }

    pub fn reset_scroll_and_scale_state(&self) {
        if self.live_host().is_none() {
            return;
        }
        if let Some(ext) = self.render_view_host_ext() {
            ext.reset_scroll_and_scale_state();
        }
    }

    /// Copy every host setting into `prefs`.
    ///
    /// Leaves `prefs` untouched if the session, its render view extension, or
    /// the host settings object is gone.
    pub fn populate_web_preferences(&self, prefs: &mut WebPreferences) {
        let Some(host) = self.live_host() else {
            return;
        };
        let Some(ext) = self.render_view_host_ext() else {
            return;
        };

        prefs.apply_fixed();

        let values = host.values();
        let switches = self.context.switches();

        prefs.allow_scripts_to_close_windows = values.allow_scripts_to_close_windows;

        // Blink's images_enabled and loads_images_automatically are
        // cross-assigned from the host's pair.
        // https://code.google.com/p/chromium/issues/detail?id=224317#c26
        prefs.images_enabled = values.loads_images_automatically;
        prefs.loads_images_automatically = values.images_enabled;

        prefs.javascript_enabled = values.javascript_enabled;
        prefs.allow_universal_access_from_file_urls = values.allow_universal_access_from_file_urls;
        prefs.allow_file_access_from_file_urls = values.allow_file_access_from_file_urls;
        prefs.javascript_can_open_windows_automatically =
            values.javascript_can_open_windows_automatically;
        prefs.supports_multiple_windows = values.support_multiple_windows;
        prefs.application_cache_enabled = host.app_cache_enabled();
        prefs.local_storage_enabled = values.dom_storage_enabled;
        prefs.databases_enabled = values.database_enabled;
        prefs.initialize_at_minimum_page_scale = values.load_with_overview_mode;
        prefs.use_wide_viewport = values.use_wide_viewport;
        prefs.user_gesture_required_for_media_playback =
            values.media_playback_requires_user_gesture;
        prefs.password_echo_enabled = host.password_echo_enabled();
        prefs.double_tap_to_zoom_enabled = host.supports_double_tap_zoom();
        prefs.spatial_navigation_enabled = values.spatial_navigation_enabled;

        prefs.allow_running_insecure_content = switches.allow_running_insecure_content;
        prefs.allow_displaying_insecure_content = !switches.no_displaying_insecure_content;

        prefs.default_video_poster_url = values.default_video_poster_url;

        prefs.text_autosizing_enabled = host.text_autosizing_enabled();
        let zoom = TextZoom::from_percent(values.text_size_percent, prefs.text_autosizing_enabled);
        if let Some(font_scale_factor) = zoom.font_scale_factor {
            prefs.font_scale_factor = font_scale_factor;
        }
        prefs.force_enable_zoom = zoom.force_enable_zoom;
        ext.set_text_zoom_factor(zoom.text_zoom_factor);

        prefs.default_font_size = values.default_font_size;
        prefs.default_fixed_font_size = values.default_fixed_font_size;

        prefs.viewport_meta_non_user_scalable_quirk = values.quirks_mode_enabled;
        prefs.clobber_user_agent_initial_scale_quirk = values.quirks_mode_enabled;
        prefs.wide_viewport_quirk = true;

        tracing::trace!("Populated web preferences for {}: {:?}", self.session_id, prefs);
    }
}

impl SessionObserver for SettingsBridge {
    fn render_view_created(&self) {
        self.update_everything();
    }
}

impl Drop for SettingsBridge {
    fn drop(&mut self) {
        self.context.unregister(self.session_id);
        if let Some(host) = self.host.get() {
            host.on_bridge_gone(self);
        }
    }
}

impl std::fmt::Debug for SettingsBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsBridge")
            .field("session_id", &self.session_id)
            .field("session_alive", &(self.session.strong_count() > 0))
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
