use crate::pages::{HomePage, NotesPage, SessionGuard};
use crate::state::{AppContext, AppState};
use crate::toast::{ToastHost, Toasts};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));
    provide_context(Toasts::new());

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <ToastHost />
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("") view=HomePage />
                // Any single-segment path lands on the guarded notes view,
                // mirroring the backend's `/:notes` route.
                <Route path=path!(":notes") view=move || view! {
                    <SessionGuard>
                        <NotesPage />
                    </SessionGuard>
                } />
            </Routes>
        </Router>
    }
}
