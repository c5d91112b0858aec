//! Autofill capabilities the engine's form-filling pipeline expects.
//!
//! The runtime keeps autofill switched on in the shared preference service
//! and gates it per session through [`XWalkAutofillClient::set_save_form_data`],
//! since one browser context serves many views with different settings.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::engine::PrefService;

/// Rectangle in view coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextDirection {
    #[default]
    Unknown,
    LeftToRight,
    RightToLeft,
}

/// One entry of an autofill popup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
    pub label: String,
    pub icon: String,
    pub frontend_id: i32,
}

impl Suggestion {
    #[must_use]
    pub fn new(value: impl Into<String>, frontend_id: i32) -> Self {
        Self {
            value: value.into(),
            frontend_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditCard {
    pub guid: String,
    pub name_on_card: String,
    pub last_four_digits: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFieldData {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub name: String,
    pub origin: String,
    pub fields: Vec<FormFieldData>,
}

/// Outcome reported to a request-autocomplete caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAutocompleteResult {
    Success,
    Cancel,
    ErrorDisabled,
}

pub type CreditCardScanCallback = Box<dyn FnOnce(&CreditCard)>;
pub type SaveCardCallback = Box<dyn FnOnce()>;
pub type RequestAutocompleteCallback = Box<dyn FnOnce(RequestAutocompleteResult)>;

/// Engine-side owner of an autofill popup.
pub trait AutofillPopupDelegate {
    fn on_popup_shown(&self) {}

    fn on_popup_hidden(&self) {}

    fn did_accept_suggestion(&self, value: &str, frontend_id: i32, position: usize);
}

pub trait CardUnmaskDelegate {
    fn on_unmask_response(&self, cvc: &str);

    fn on_unmask_prompt_closed(&self);
}

/// Stored addresses and cards.
pub trait PersonalDataManager {
    fn credit_cards(&self) -> Vec<CreditCard>;
}

/// Host-side view that actually draws the popup.
pub trait AutofillPopupView {
    fn show_autofill_popup(&self, element_bounds: RectF, is_rtl: bool, suggestions: &[Suggestion]);

    fn hide_autofill_popup(&self);
}

/// Operations the autofill pipeline calls on its per-session client.
///
/// Every method has a body that reports the capability as unsupported, so an
/// implementation only overrides what it actually provides.
pub trait AutofillClient {
    fn personal_data_manager(&self) -> Option<Rc<dyn PersonalDataManager>> {
        None
    }

    fn prefs(&self) -> Option<Rc<dyn PrefService>> {
        None
    }

    fn hide_request_autocomplete_dialog(&self) {
        tracing::debug!("hide_request_autocomplete_dialog is not implemented");
    }

    fn show_autofill_settings(&self) {
        tracing::debug!("show_autofill_settings is not implemented");
    }

    fn show_unmask_prompt(&self, _card: &CreditCard, _delegate: Weak<dyn CardUnmaskDelegate>) {
        tracing::debug!("show_unmask_prompt is not implemented");
    }

    fn on_unmask_verification_result(&self, _success: bool) {
        tracing::debug!("on_unmask_verification_result is not implemented");
    }

    /// The callback is dropped without running; nothing is saved.
    fn confirm_save_credit_card(&self, _save_card: SaveCardCallback) {
        tracing::debug!("confirm_save_credit_card is not implemented");
    }

    fn has_credit_card_scan_feature(&self) -> bool {
        false
    }

    fn scan_credit_card(&self, _callback: CreditCardScanCallback) {
        tracing::debug!("scan_credit_card is not implemented");
    }

    fn show_request_autocomplete_dialog(
        &self,
        _form: &FormData,
        callback: RequestAutocompleteCallback,
    ) {
        tracing::debug!("show_request_autocomplete_dialog is not implemented");
        callback(RequestAutocompleteResult::ErrorDisabled);
    }

    fn show_autofill_popup(
        &self,
        _element_bounds: RectF,
        _text_direction: TextDirection,
        _suggestions: &[Suggestion],
        _delegate: Weak<dyn AutofillPopupDelegate>,
    ) {
        tracing::debug!("show_autofill_popup is not implemented");
    }

    fn update_autofill_popup_data_list_values(&self, _values: &[String], _labels: &[String]) {
        tracing::debug!("update_autofill_popup_data_list_values is not implemented");
    }

    fn hide_autofill_popup(&self) {}

    fn is_autocomplete_enabled(&self) -> bool {
        false
    }

    fn detect_account_creation_forms(&self, _forms: &[FormData]) {}

    fn did_fill_or_preview_field(&self, _autofilled_value: &str, _profile_full_name: &str) {}

    fn on_first_user_gesture_observed(&self) {
        tracing::debug!("on_first_user_gesture_observed is not implemented");
    }
}

/// Per-session autofill client for the embedded runtime.
pub struct XWalkAutofillClient {
    save_form_data: Cell<bool>,
    prefs: Option<Rc<dyn PrefService>>,
    popup_view: RefCell<Option<Weak<dyn AutofillPopupView>>>,
    suggestions: RefCell<Vec<Suggestion>>,
    delegate: RefCell<Option<Weak<dyn AutofillPopupDelegate>>>,
}

impl XWalkAutofillClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            save_form_data: Cell::new(false),
            prefs: None,
            popup_view: RefCell::new(None),
            suggestions: RefCell::new(Vec::new()),
            delegate: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn with_prefs(mut self, prefs: Rc<dyn PrefService>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Attach the host view that renders popups.
    pub fn set_popup_view<V: AutofillPopupView + 'static>(&self, view: &Rc<V>) {
        let view: Weak<dyn AutofillPopupView> = Rc::<V>::downgrade(view);
        *self.popup_view.borrow_mut() = Some(view);
    }

    pub fn set_save_form_data(&self, enabled: bool) {
        self.save_form_data.set(enabled);
    }

    #[must_use]
    pub fn save_form_data(&self) -> bool {
        self.save_form_data.get()
    }

    /// Suggestions from the most recent popup.
    #[must_use]
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.borrow().clone()
    }

    /// The host reports that the user picked the suggestion at `position`.
    pub fn suggestion_selected(&self, position: usize) {
        let delegate = self.delegate.borrow().as_ref().and_then(Weak::upgrade);
        let Some(delegate) = delegate else {
            tracing::debug!("Suggestion {} selected without a live popup delegate", position);
            return;
        };
        let suggestion = self.suggestions.borrow().get(position).cloned();
        let Some(suggestion) = suggestion else {
            tracing::warn!("Selected suggestion {} is out of range", position);
            return;
        };
        delegate.did_accept_suggestion(&suggestion.value, suggestion.frontend_id, position);
    }

    fn popup_view(&self) -> Option<Rc<dyn AutofillPopupView>> {
        self.popup_view.borrow().as_ref().and_then(Weak::upgrade)
    }
}

impl Default for XWalkAutofillClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AutofillClient for XWalkAutofillClient {
    fn prefs(&self) -> Option<Rc<dyn PrefService>> {
        self.prefs.clone()
    }

    fn show_autofill_popup(
        &self,
        element_bounds: RectF,
        text_direction: TextDirection,
        suggestions: &[Suggestion],
        delegate: Weak<dyn AutofillPopupDelegate>,
    ) {
        *self.suggestions.borrow_mut() = suggestions.to_vec();
        *self.delegate.borrow_mut() = Some(delegate);

        let Some(view) = self.popup_view() else {
            tracing::debug!("No popup view attached, dropping {} suggestions", suggestions.len());
            return;
        };
        view.show_autofill_popup(
            element_bounds,
            text_direction == TextDirection::RightToLeft,
            suggestions,
        );
    }

    fn hide_autofill_popup(&self) {
        *self.delegate.borrow_mut() = None;
        if let Some(view) = self.popup_view() {
            view.hide_autofill_popup();
        }
    }

    fn is_autocomplete_enabled(&self) -> bool {
        self.save_form_data()
    }
}

impl std::fmt::Debug for XWalkAutofillClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XWalkAutofillClient")
            .field("save_form_data", &self.save_form_data.get())
            .field("suggestions", &self.suggestions.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePrefService;

    #[derive(Default)]
    struct RecordingView {
        shown: RefCell<Vec<(RectF, bool, usize)>>,
        hidden: Cell<usize>,
    }

    impl AutofillPopupView for RecordingView {
        fn show_autofill_popup(&self, bounds: RectF, is_rtl: bool, suggestions: &[Suggestion]) {
            self.shown.borrow_mut().push((bounds, is_rtl, suggestions.len()));
        }

        fn hide_autofill_popup(&self) {
            self.hidden.set(self.hidden.get() + 1);
        }
    }

    #[derive(Default)]
    struct RecordingDelegate {
        accepted: RefCell<Vec<(String, i32, usize)>>,
    }

    impl AutofillPopupDelegate for RecordingDelegate {
        fn did_accept_suggestion(&self, value: &str, frontend_id: i32, position: usize) {
            self.accepted
                .borrow_mut()
                .push((value.to_string(), frontend_id, position));
        }
    }

    fn suggestions() -> Vec<Suggestion> {
        vec![
            Suggestion::new("alice@example.com", 1).with_label("Work"),
            Suggestion::new("alice@home.example", 2),
        ]
    }

    fn delegate_weak(delegate: &Rc<RecordingDelegate>) -> Weak<dyn AutofillPopupDelegate> {
        let weak: Weak<RecordingDelegate> = Rc::downgrade(delegate);
        weak
    }

    struct Bare;

    impl AutofillClient for Bare {}

    #[test]
    fn test_save_form_data_default_and_set() {
        let client = XWalkAutofillClient::new();
        assert!(!client.save_form_data());
        assert!(!client.is_autocomplete_enabled());

        client.set_save_form_data(true);
        assert!(client.save_form_data());
        assert!(client.is_autocomplete_enabled());

        client.set_save_form_data(false);
        assert!(!client.save_form_data());
    }

    #[test]
    fn test_prefs_capability() {
        assert!(XWalkAutofillClient::new().prefs().is_none());

        let prefs = Rc::new(FakePrefService::default());
        let client = XWalkAutofillClient::new().with_prefs(prefs);
        assert!(client.prefs().is_some());
        assert!(client.personal_data_manager().is_none());
    }

    #[test]
    fn test_show_popup_caches_and_forwards() {
        let client = XWalkAutofillClient::new();
        let view = Rc::new(RecordingView::default());
        client.set_popup_view(&view);
        let delegate = Rc::new(RecordingDelegate::default());

        let bounds = RectF::new(10.0, 20.0, 100.0, 30.0);
        client.show_autofill_popup(
            bounds,
            TextDirection::RightToLeft,
            &suggestions(),
            delegate_weak(&delegate),
        );

        assert_eq!(client.suggestions(), suggestions());
        assert_eq!(*view.shown.borrow(), vec![(bounds, true, 2)]);
    }

    #[test]
    fn test_suggestion_selected_notifies_delegate() {
        let client = XWalkAutofillClient::new();
        let delegate = Rc::new(RecordingDelegate::default());
        client.show_autofill_popup(
            RectF::default(),
            TextDirection::LeftToRight,
            &suggestions(),
            delegate_weak(&delegate),
        );

        client.suggestion_selected(1);
        client.suggestion_selected(5);
        assert_eq!(
            *delegate.accepted.borrow(),
            vec![("alice@home.example".to_string(), 2, 1)]
        );
    }

    #[test]
    fn test_hide_popup_drops_delegate() {
        let client = XWalkAutofillClient::new();
        let view = Rc::new(RecordingView::default());
        client.set_popup_view(&view);
        let delegate = Rc::new(RecordingDelegate::default());
        client.show_autofill_popup(
            RectF::default(),
            TextDirection::Unknown,
            &suggestions(),
            delegate_weak(&delegate),
        );

        client.hide_autofill_popup();
        client.suggestion_selected(0);
        assert_eq!(view.hidden.get(), 1);
        assert!(delegate.accepted.borrow().is_empty());
    }

    #[test]
    fn test_suggestion_selected_with_dead_delegate() {
        let client = XWalkAutofillClient::new();
        let delegate = Rc::new(RecordingDelegate::default());
        client.show_autofill_popup(
            RectF::default(),
            TextDirection::LeftToRight,
            &suggestions(),
            delegate_weak(&delegate),
        );
        drop(delegate);

        // Must not panic.
        client.suggestion_selected(0);
    }

    #[test]
    fn test_default_capabilities_are_unsupported() {
        let client = Bare;
        assert!(!client.has_credit_card_scan_feature());
        assert!(!client.is_autocomplete_enabled());
        assert!(client.prefs().is_none());

        let scanned = Rc::new(Cell::new(false));
        let flag = Rc::clone(&scanned);
        client.scan_credit_card(Box::new(move |_: &CreditCard| flag.set(true)));
        assert!(!scanned.get());

        let saved = Rc::new(Cell::new(false));
        let flag = Rc::clone(&saved);
        client.confirm_save_credit_card(Box::new(move || flag.set(true)));
        assert!(!saved.get());

        let result = Rc::new(Cell::new(None));
        let slot = Rc::clone(&result);
        client.show_request_autocomplete_dialog(
            &FormData::default(),
            Box::new(move |r: RequestAutocompleteResult| slot.set(Some(r))),
        );
        assert_eq!(result.get(), Some(RequestAutocompleteResult::ErrorDisabled));

        client.show_autofill_settings();
        client.hide_request_autocomplete_dialog();
        client.on_unmask_verification_result(true);
        client.update_autofill_popup_data_list_values(&["a".to_string()], &["b".to_string()]);
        client.detect_account_creation_forms(&[FormData::default()]);
        client.did_fill_or_preview_field("value", "Alice");
        client.on_first_user_gesture_observed();
        client.hide_autofill_popup();
    }
}
