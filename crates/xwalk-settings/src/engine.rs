//! Engine-owned objects the bridge talks to.
//!
//! The embedder implements these on top of its browser engine. All calls
//! happen on the UI thread, so implementations are expected to use interior
//! mutability rather than `&mut self`.

use std::rc::Rc;

use crate::autofill::XWalkAutofillClient;

/// Preference key holding the comma separated accept-languages list.
pub const ACCEPT_LANGUAGES_PREF: &str = "intl.accept_languages";

/// Identifies one browsing session (a single web view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// One browsing session as seen from the browser process.
pub trait Session {
    fn id(&self) -> SessionId;

    fn set_user_agent_override(&self, user_agent: &str);

    fn navigation_entry_count(&self) -> usize;

    /// Mark the navigation entry at `index` as loaded with (or without) the
    /// user agent override.
    fn set_entry_overriding_user_agent(&self, index: usize, overriding: bool);

    fn render_view_host(&self) -> Option<Rc<dyn RenderViewHost>>;

    /// The runtime's per-session render view extension. There is only ever
    /// one per session, and it always targets the current render view host.
    fn render_view_host_ext(&self) -> Option<Rc<dyn RenderViewHostExt>>;

    fn autofill_client(&self) -> Option<Rc<XWalkAutofillClient>> {
        None
    }
}

/// The browser-side handle of a renderer's view.
pub trait RenderViewHost {
    /// Ask the engine to rebuild and push preferences to the renderer.
    ///
    /// Engines typically respond by calling back into a
    /// [`WebPreferencesPopulater`](crate::WebPreferencesPopulater).
    fn on_webkit_preferences_changed(&self);
}

/// Runtime-specific render view operations.
pub trait RenderViewHostExt {
    fn set_text_zoom_factor(&self, factor: f32);

    /// Set the initial page scale, or pass a negative value for no override.
    fn set_initial_page_scale(&self, scale: f32);

    fn reset_scroll_and_scale_state(&self);
}

/// String-keyed preference storage for the browser context.
pub trait PrefService {
    fn set_string(&self, key: &str, value: &str);

    fn get_string(&self, key: &str) -> Option<String>;
}

/// Notifications a session delivers to objects observing it.
pub trait SessionObserver {
    fn render_view_created(&self) {}
}
