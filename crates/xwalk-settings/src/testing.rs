//! Recording fakes of the engine traits, shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::autofill::XWalkAutofillClient;
use crate::engine::{PrefService, RenderViewHost, RenderViewHostExt, Session, SessionId};

pub type CallLog = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
pub struct FakePrefService {
    values: RefCell<HashMap<String, String>>,
}

impl PrefService for FakePrefService {
    fn set_string(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

pub struct FakeRenderViewHost {
    log: CallLog,
    pub changes: Cell<usize>,
}

impl RenderViewHost for FakeRenderViewHost {
    fn on_webkit_preferences_changed(&self) {
        self.log.borrow_mut().push("preferences_changed".to_string());
        self.changes.set(self.changes.get() + 1);
    }
}

pub struct FakeExt {
    log: CallLog,
    pub text_zoom_factor: Cell<Option<f32>>,
    pub initial_page_scale: Cell<Option<f32>>,
    pub resets: Cell<usize>,
}

impl RenderViewHostExt for FakeExt {
    fn set_text_zoom_factor(&self, factor: f32) {
        self.log.borrow_mut().push(format!("text_zoom:{factor}"));
        self.text_zoom_factor.set(Some(factor));
    }

    fn set_initial_page_scale(&self, scale: f32) {
        self.log.borrow_mut().push(format!("initial_scale:{scale}"));
        self.initial_page_scale.set(Some(scale));
    }

    fn reset_scroll_and_scale_state(&self) {
        self.log.borrow_mut().push("reset_scroll".to_string());
        self.resets.set(self.resets.get() + 1);
    }
}

pub struct FakeSession {
    id: SessionId,
    pub log: CallLog,
    pub user_agent_override: RefCell<Option<String>>,
    pub entries: RefCell<Vec<bool>>,
    pub rvh: Option<Rc<FakeRenderViewHost>>,
    pub ext: Option<Rc<FakeExt>>,
    pub autofill: Option<Rc<XWalkAutofillClient>>,
}

impl FakeSession {
    pub fn new(id: u64) -> Self {
        let log = CallLog::default();
        Self {
            id: SessionId::new(id),
            rvh: Some(Rc::new(FakeRenderViewHost {
                log: log.clone(),
                changes: Cell::new(0),
            })),
            ext: Some(Rc::new(FakeExt {
                log: log.clone(),
                text_zoom_factor: Cell::new(None),
                initial_page_scale: Cell::new(None),
                resets: Cell::new(0),
            })),
            log,
            user_agent_override: RefCell::new(None),
            entries: RefCell::new(Vec::new()),
            autofill: Some(Rc::new(XWalkAutofillClient::new())),
        }
    }

    pub fn without_ext(mut self) -> Self {
        self.ext = None;
        self
    }

    pub fn with_entries(self, count: usize) -> Self {
        *self.entries.borrow_mut() = vec![false; count];
        self
    }

    pub fn ext(&self) -> &FakeExt {
        self.ext.as_deref().expect("fake session has an ext")
    }

    pub fn rvh(&self) -> &FakeRenderViewHost {
        self.rvh.as_deref().expect("fake session has a render view host")
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Session for FakeSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn set_user_agent_override(&self, user_agent: &str) {
        self.log.borrow_mut().push("user_agent".to_string());
        *self.user_agent_override.borrow_mut() = Some(user_agent.to_string());
    }

    fn navigation_entry_count(&self) -> usize {
        self.entries.borrow().len()
    }

    fn set_entry_overriding_user_agent(&self, index: usize, overriding: bool) {
        self.entries.borrow_mut()[index] = overriding;
    }

    fn render_view_host(&self) -> Option<Rc<dyn RenderViewHost>> {
        self.rvh.clone().map(|rvh| rvh as Rc<dyn RenderViewHost>)
    }

    fn render_view_host_ext(&self) -> Option<Rc<dyn RenderViewHostExt>> {
        self.ext.clone().map(|ext| ext as Rc<dyn RenderViewHostExt>)
    }

    fn autofill_client(&self) -> Option<Rc<XWalkAutofillClient>> {
        // Only reached when forwarding the save-form-data preference.
        self.log.borrow_mut().push("save_form_data".to_string());
        self.autofill.clone()
    }
}
