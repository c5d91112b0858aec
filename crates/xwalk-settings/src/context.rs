//! Shared runtime state for every session created by one embedder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::engine::{PrefService, SessionId};
use crate::{RuntimeSwitches, SettingsBridge};

/// Runtime switches, the preference service, and the session to bridge
/// association.
pub struct BrowserContext {
    switches: RuntimeSwitches,
    prefs: Option<Rc<dyn PrefService>>,
    bridges: RefCell<HashMap<SessionId, Weak<SettingsBridge>>>,
}

impl BrowserContext {
    #[must_use]
    pub fn new(switches: RuntimeSwitches) -> Self {
        Self {
            switches,
            prefs: None,
            bridges: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_pref_service(mut self, prefs: Rc<dyn PrefService>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    #[must_use]
    pub fn switches(&self) -> RuntimeSwitches {
        self.switches
    }

    #[must_use]
    pub fn pref_service(&self) -> Option<Rc<dyn PrefService>> {
        self.prefs.clone()
    }

    /// The bridge attached to `session`, if one is alive.
    #[must_use]
    pub fn settings_for(&self, session: SessionId) -> Option<Rc<SettingsBridge>> {
        self.bridges.borrow().get(&session).and_then(Weak::upgrade)
    }

    /// Number of sessions with a live bridge.
    #[must_use]
    pub fn bridge_count(&self) -> usize {
        self.bridges
            .borrow()
            .values()
            .filter(|bridge| bridge.strong_count() > 0)
            .count()
    }

    pub(crate) fn register(&self, session: SessionId, bridge: &Rc<SettingsBridge>) {
        let previous = self
            .bridges
            .borrow_mut()
            .insert(session, Rc::downgrade(bridge));
        if previous.is_some_and(|old| old.strong_count() > 0) {
            tracing::warn!("Replacing live settings bridge for {}", session);
        }
    }

    /// Drop the entry for `session` unless a newer bridge has taken it over.
    pub(crate) fn unregister(&self, session: SessionId) {
        let mut bridges = self.bridges.borrow_mut();
        if bridges
            .get(&session)
            .is_some_and(|bridge| bridge.strong_count() == 0)
        {
            bridges.remove(&session);
        }
    }
}

impl Default for BrowserContext {
    fn default() -> Self {
        Self::new(RuntimeSwitches::default())
    }
}

impl std::fmt::Debug for BrowserContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserContext")
            .field("switches", &self.switches)
            .field("has_pref_service", &self.prefs.is_some())
            .field("bridges", &self.bridge_count())
            .finish()
    }
}
