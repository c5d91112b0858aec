//! Settings and autofill bridge for an embedded web runtime.
//!
//! This crate relays configuration from a host application's settings object
//! into a browser engine's per-view preference record, and provides the
//! autofill client the engine's form-filling pipeline talks to.
//!
//! The engine itself is not part of this crate. Sessions, render view hosts
//! and the preference service are traits in [`engine`] that the embedder
//! implements.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use xwalk_settings::{
//!     BrowserContext, HostHandle, InMemorySettings, RuntimeSwitches, SettingsBridge,
//!     SettingsPopulater, WebPreferences, WebPreferencesPopulater,
//! };
//!
//! let context = Rc::new(BrowserContext::new(RuntimeSwitches::from_args(std::env::args())));
//! let settings = Rc::new(InMemorySettings::from_json(r#"{"text_size_percent":120}"#)?);
//! let bridge = SettingsBridge::new(&context, &session, HostHandle::new(&settings));
//! settings.attach_bridge(&bridge);
//!
//! // Later, when the engine builds preferences for the session's render view:
//! let populater = SettingsPopulater::new(Rc::clone(&context));
//! let mut prefs = WebPreferences::default();
//! populater.populate_for(session.as_ref(), &mut prefs);
//! ```
//!
//! ## Threading
//!
//! Everything here runs on the engine's UI thread. Types use `Rc` and
//! `RefCell` and are deliberately `!Send`.

pub mod autofill;
pub mod bridge;
pub mod context;
pub mod engine;
pub mod error;
pub mod host;
pub mod memory;
pub mod populater;
pub mod prefs;
pub mod switches;

#[cfg(test)]
mod testing;

pub use autofill::{AutofillClient, Suggestion, XWalkAutofillClient};
pub use bridge::{default_user_agent, SettingsBridge, TextZoom};
pub use context::BrowserContext;
pub use engine::{Session, SessionId};
pub use error::{Error, Result};
pub use host::{HostHandle, HostSettings, LayoutAlgorithm, SettingsValues};
pub use memory::InMemorySettings;
pub use populater::{SettingsPopulater, WebPreferencesPopulater};
pub use prefs::WebPreferences;
pub use switches::RuntimeSwitches;
