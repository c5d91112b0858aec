//! Wiring a toy engine to the settings bridge.
//!
//! Run with: `RUST_LOG=debug cargo run --example settings -- --allow-running-insecure-content`

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing_subscriber::EnvFilter;
use xwalk_settings::engine::{RenderViewHost, RenderViewHostExt, SessionObserver};
use xwalk_settings::{
    BrowserContext, HostHandle, InMemorySettings, LayoutAlgorithm, RuntimeSwitches, Session,
    SessionId, SettingsBridge, SettingsPopulater, WebPreferences, WebPreferencesPopulater,
    XWalkAutofillClient,
};

/// Render view that rebuilds its preferences through the populater.
struct ToyRenderView {
    session: RefCell<Weak<ToySession>>,
    populater: Rc<dyn WebPreferencesPopulater>,
    prefs: RefCell<WebPreferences>,
    text_zoom: Cell<f32>,
}

impl RenderViewHost for ToyRenderView {
    fn on_webkit_preferences_changed(&self) {
        let Some(session) = self.session.borrow().upgrade() else {
            return;
        };
        let mut prefs = self.prefs.borrow().clone();
        self.populater.populate_for(session.as_ref(), &mut prefs);
        *self.prefs.borrow_mut() = prefs;
    }
}

impl RenderViewHostExt for ToyRenderView {
    fn set_text_zoom_factor(&self, factor: f32) {
        self.text_zoom.set(factor);
    }

    fn set_initial_page_scale(&self, scale: f32) {
        tracing::info!("Initial page scale: {}", scale);
    }

    fn reset_scroll_and_scale_state(&self) {
        tracing::info!("Scroll and scale reset");
    }
}

struct ToySession {
    id: SessionId,
    view: Rc<ToyRenderView>,
    autofill: Rc<XWalkAutofillClient>,
}

impl Session for ToySession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn set_user_agent_override(&self, user_agent: &str) {
        tracing::info!("User agent override: {}", user_agent);
    }

    fn navigation_entry_count(&self) -> usize {
        0
    }

    fn set_entry_overriding_user_agent(&self, _index: usize, _overriding: bool) {}

    fn render_view_host(&self) -> Option<Rc<dyn RenderViewHost>> {
        Some(self.view.clone() as Rc<dyn RenderViewHost>)
    }

    fn render_view_host_ext(&self) -> Option<Rc<dyn RenderViewHostExt>> {
        Some(self.view.clone() as Rc<dyn RenderViewHostExt>)
    }

    fn autofill_client(&self) -> Option<Rc<XWalkAutofillClient>> {
        Some(self.autofill.clone())
    }
}

fn main() -> xwalk_settings::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let switches = RuntimeSwitches::from_args(std::env::args().skip(1));
    let context = Rc::new(BrowserContext::new(switches));
    let populater: Rc<dyn WebPreferencesPopulater> =
        Rc::new(SettingsPopulater::new(Rc::clone(&context)));

    let view = Rc::new(ToyRenderView {
        session: RefCell::new(Weak::new()),
        populater,
        prefs: RefCell::new(WebPreferences::default()),
        text_zoom: Cell::new(1.0),
    });
    let session = Rc::new(ToySession {
        id: SessionId::new(1),
        view: Rc::clone(&view),
        autofill: Rc::new(XWalkAutofillClient::new()),
    });
    *view.session.borrow_mut() = Rc::downgrade(&session);

    let settings = Rc::new(InMemorySettings::from_json(
        r#"{"text_size_percent":140,"images_enabled":false,"user_agent":"ToyBrowser/1.0"}"#,
    )?);
    let bridge = SettingsBridge::new(&context, &session, HostHandle::new(&settings));
    settings.attach_bridge(&bridge);

    // The engine announces the render view, which pushes everything once.
    bridge.render_view_created();
    println!("{}", serde_json::to_string_pretty(&*view.prefs.borrow())?);
    println!("text zoom factor: {}", view.text_zoom.get());

    settings.set_layout_algorithm(LayoutAlgorithm::TextAutosizing);
    println!(
        "autosizing: font scale {} force zoom {} text zoom {}",
        view.prefs.borrow().font_scale_factor,
        view.prefs.borrow().force_enable_zoom,
        view.text_zoom.get()
    );
    println!("save form data: {}", session.autofill.save_form_data());

    drop(settings);
    bridge.update_everything();
    Ok(())
}
