use leptos::prelude::*;
use leptos_dom::helpers::set_timeout;
use std::time::Duration;

/// Toasts auto-dismiss after this long (manual close stays available).
const TOAST_AUTO_CLOSE_MS: u64 = 2000;

/// Keep the stack short; oldest entries are dropped first.
const TOAST_MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

pub(crate) fn push_capped(items: &mut Vec<Toast>, toast: Toast, max: usize) {
    items.push(toast);
    if items.len() > max {
        let overflow = items.len() - max;
        items.drain(..overflow);
    }
}

pub(crate) fn remove_by_id(items: &mut Vec<Toast>, id: u64) {
    items.retain(|t| t.id != id);
}

/// App-wide notification store, provided once from `App` and looked up
/// with `expect_context::<Toasts>()`. Auth flows toast on every outcome;
/// note-list flows never do.
#[derive(Clone, Copy)]
pub(crate) struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(vec![]),
            next_id: RwSignal::new(0),
        }
    }

    pub fn items(&self) -> RwSignal<Vec<Toast>> {
        self.items
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    pub fn dismiss(&self, id: u64) {
        // try_update: the dismiss timer may outlive a teardown during tests.
        let _ = self.items.try_update(|items| remove_by_id(items, id));
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get_untracked().wrapping_add(1);
        self.next_id.set(id);

        self.items.update(|items| {
            push_capped(items, Toast { id, kind, message }, TOAST_MAX_VISIBLE)
        });

        let store = *self;
        set_timeout(
            move || store.dismiss(id),
            Duration::from_millis(TOAST_AUTO_CLOSE_MS),
        );
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed top-right toast stack. Mounted once, next to the router.
#[component]
pub(crate) fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let items = toasts.items();

    view! {
        <div class="pointer-events-none fixed right-4 top-4 z-50 flex w-full max-w-sm flex-col gap-2">
            {move || {
                items
                    .get()
                    .into_iter()
                    .map(|t| {
                        let border = match t.kind {
                            ToastKind::Success => "border-success/50",
                            ToastKind::Error => "border-destructive/50",
                            ToastKind::Info => "border-border",
                        };
                        let id = t.id;
                        view! {
                            <div
                                data-kind=t.kind.to_string()
                                class=format!(
                                    "pointer-events-auto flex items-start gap-2 rounded-lg border bg-card px-4 py-3 text-sm shadow-sm {border}"
                                )
                            >
                                <span class="flex-1 break-words">{t.message}</span>
                                <button
                                    class="text-muted-foreground hover:text-foreground"
                                    aria-label="Dismiss"
                                    on:click=move |_| toasts.dismiss(id)
                                >
                                    "\u{d7}"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(id: u64, message: &str) -> Toast {
        Toast {
            id,
            kind: ToastKind::Info,
            message: message.to_string(),
        }
    }

    #[test]
    fn push_capped_drops_oldest_first() {
        let mut items = vec![];
        for i in 0..4 {
            push_capped(&mut items, toast(i, "m"), 3);
        }
        let ids: Vec<u64> = items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn remove_by_id_is_a_noop_for_unknown_ids() {
        let mut items = vec![toast(1, "a"), toast(2, "b")];
        remove_by_id(&mut items, 9);
        assert_eq!(items.len(), 2);

        remove_by_id(&mut items, 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }

    #[test]
    fn kind_renders_lowercase_for_data_attribute() {
        assert_eq!(ToastKind::Success.to_string(), "success");
        assert_eq!(ToastKind::Error.to_string(), "error");
        assert_eq!(ToastKind::Info.to_string(), "info");
    }
}
