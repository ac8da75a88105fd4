pub(crate) mod otp;

use crate::api::ApiClient;
use crate::models::{Note, User};
use leptos::prelude::*;

/// Which auth form occupies the window. Purely a UI-routing toggle;
/// never persisted, reset on reload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AuthMode {
    Login,
    Signup,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Login/signup toggle for the root route.
    pub auth_mode: RwSignal<AuthMode>,

    /// Profile loaded from `GET /user/me` after the route guard passes.
    pub current_user: RwSignal<Option<User>>,

    /// Transient snapshot of the server's note list. Every mutation is
    /// followed by an unconditional full re-fetch, so this is never
    /// patched locally.
    pub notes: RwSignal<Vec<Note>>,
    pub notes_loading: RwSignal<bool>,

    /// Re-fetch guard: stale responses are dropped, the latest snapshot wins.
    pub notes_request_id: RwSignal<u64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::from_env()),
            auth_mode: RwSignal::new(AuthMode::Login),
            current_user: RwSignal::new(None),
            notes: RwSignal::new(vec![]),
            notes_loading: RwSignal::new(false),
            notes_request_id: RwSignal::new(0),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
