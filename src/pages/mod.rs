use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner, Textarea,
};
use crate::api::ApiErrorKind;
use crate::state::otp::OtpFlow;
use crate::state::{AppContext, AuthMode};
use crate::toast::Toasts;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

/// Root route: login or signup form on the left, decorative panel on the
/// right (hidden on small screens).
///
/// Switching modes remounts the forms, so no entered data survives the
/// toggle; each form owns its local signals.
#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let mode = app_state.0.auth_mode;

    view! {
        <div class="grid min-h-screen w-full grid-cols-1 bg-background sm:grid-cols-2">
            <div class="flex items-center justify-center px-4">
                {move || match mode.get() {
                    AuthMode::Login => view! { <LoginForm /> }.into_any(),
                    AuthMode::Signup => view! { <SignupForm /> }.into_any(),
                }}
            </div>
            <div class="hidden h-full w-full bg-muted sm:block" aria-hidden="true"></div>
        </div>
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let otp_input: RwSignal<String> = RwSignal::new(String::new());
    let flow: RwSignal<OtpFlow> = RwSignal::new(OtpFlow::new());

    let app_state = expect_context::<AppContext>();
    let toasts = expect_context::<Toasts>();
    let navigate = StoredValue::new(use_navigate());

    let on_send_otp = move |_ev: web_sys::MouseEvent| {
        let email_val = email.get_untracked();

        let mut f = flow.get_untracked();
        if let Err(block) = f.begin_send(&email_val) {
            toasts.error(block.message());
            return;
        }
        flow.set(f);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.send_otp(&email_val).await {
                Ok(res) if res.success => {
                    toasts.success(res.msg_or("OTP sent").to_string());
                    flow.update(|f| f.finish_send(true));
                }
                Ok(res) => {
                    toasts.error(res.msg_or("Failed to send OTP").to_string());
                    flow.update(|f| f.finish_send(false));
                }
                Err(e) => {
                    toasts.error(format!("Failed to send OTP: {e}"));
                    flow.update(|f| f.abort_send());
                }
            }
        });
    };

    let on_verify_otp = move |_ev: web_sys::MouseEvent| {
        let email_val = email.get_untracked();
        let otp_val = otp_input.get_untracked();

        let mut f = flow.get_untracked();
        if let Err(block) = f.begin_verify(&otp_val) {
            toasts.error(block.message());
            return;
        }
        flow.set(f);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.verify_otp(&email_val, &otp_val).await {
                Ok(res) if res.success => {
                    toasts.success(res.msg_or("OTP verified").to_string());
                    flow.update(|f| f.finish_verify(true));

                    // Final login call; the session cookie is set server-side.
                    match api_client.login().await {
                        Ok(res) if res.success => {
                            toasts.success(res.msg_or("Logged in").to_string());
                            navigate.with_value(|nav| nav("/notes", Default::default()));
                        }
                        Ok(res) => {
                            toasts.error(res.msg_or("Login failed").to_string());
                        }
                        Err(e) => {
                            toasts.error(format!("Failed to login: {e}"));
                        }
                    }
                }
                Ok(res) => {
                    toasts.error(res.msg_or("Invalid OTP").to_string());
                    flow.update(|f| f.finish_verify(false));
                }
                Err(e) => {
                    toasts.error(format!("Failed to verify OTP: {e}"));
                    flow.update(|f| f.finish_verify(false));
                }
            }
        });
    };

    view! {
        <div class="w-full max-w-md space-y-6 py-12 text-center">
            <div class="mb-2 flex items-center justify-center gap-2">
                <span class="text-2xl font-bold">"Quicknotes"</span>
            </div>

            <h2 class="text-3xl font-bold">"Sign in with Email"</h2>
            <p class="text-muted-foreground">"We'll send you an OTP for verification"</p>

            <div class="space-y-4 text-left">
                <div>
                    <Label html_for="login_email" class="sr-only">"Email"</Label>
                    <Input
                        id="login_email"
                        r#type="email"
                        name="email"
                        placeholder="Email"
                        bind_value=email
                        required=true
                        autofocus=true
                    />
                    <div class="mt-2 flex justify-end gap-2">
                        <Button
                            variant=ButtonVariant::Secondary
                            size=ButtonSize::Sm
                            attr:r#type="button"
                            attr:disabled=move || flow.get().sending()
                            on:click=on_send_otp
                        >
                            {move || {
                                let f = flow.get();
                                if f.sending() {
                                    "Sending..."
                                } else if f.otp_sent() {
                                    "Resend"
                                } else {
                                    "Send OTP"
                                }
                            }}
                        </Button>
                    </div>
                </div>

                <Show when=move || flow.get().otp_sent() fallback=|| ().into_view()>
                    <div class="flex items-center gap-2">
                        <Input
                            r#type="text"
                            placeholder="Enter OTP"
                            bind_value=otp_input
                            class="flex-1"
                        />
                        <Button
                            variant=ButtonVariant::Success
                            attr:r#type="button"
                            attr:disabled=move || flow.get().verifying()
                            on:click=on_verify_otp
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || flow.get().verifying() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if flow.get().verifying() { "Verifying..." } else { "Verify" }}
                            </span>
                        </Button>
                    </div>
                </Show>
            </div>

            <Alert class="border-warning/50 text-left text-xs">
                <AlertDescription>
                    "Please make sure your browser allows third-party cookies for this app."
                </AlertDescription>
            </Alert>

            <p class="text-sm text-muted-foreground">
                "Don't have an account? "
                <button
                    class="text-primary underline-offset-4 hover:underline"
                    on:click=move |_| app_state.0.auth_mode.set(AuthMode::Signup)
                >
                    "Sign up"
                </button>
            </p>
        </div>
    }
}

#[component]
pub fn SignupForm() -> impl IntoView {
    let name: RwSignal<String> = RwSignal::new(String::new());
    let dob: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let otp_input: RwSignal<String> = RwSignal::new(String::new());
    let flow: RwSignal<OtpFlow> = RwSignal::new(OtpFlow::new());
    let signing_up: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let toasts = expect_context::<Toasts>();
    let navigate = StoredValue::new(use_navigate());

    let on_send_otp = move |_ev: web_sys::MouseEvent| {
        let email_val = email.get_untracked();

        let mut f = flow.get_untracked();
        if let Err(block) = f.begin_send(&email_val) {
            toasts.error(block.message());
            return;
        }
        flow.set(f);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.send_otp(&email_val).await {
                Ok(res) if res.success => {
                    otp_input.set(String::new());
                    toasts.success(
                        res.msg_or(&format!("OTP sent to {email_val}")).to_string(),
                    );
                    flow.update(|f| f.finish_send(true));
                }
                Ok(res) => {
                    toasts.error(res.msg_or("Failed to send OTP").to_string());
                    flow.update(|f| f.finish_send(false));
                }
                Err(e) => {
                    toasts.error(format!("Failed to send OTP: {e}"));
                    flow.update(|f| f.abort_send());
                }
            }
        });
    };

    let on_verify_otp = move |_ev: web_sys::MouseEvent| {
        let email_val = email.get_untracked();
        let otp_val = otp_input.get_untracked();

        let mut f = flow.get_untracked();
        if let Err(block) = f.begin_verify(&otp_val) {
            toasts.error(block.message());
            return;
        }
        flow.set(f);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.verify_otp(&email_val, &otp_val).await {
                Ok(res) if res.success => {
                    toasts.success(res.msg_or("OTP verified").to_string());
                    flow.update(|f| f.finish_verify(true));
                }
                Ok(res) => {
                    toasts.error(res.msg_or("Invalid OTP").to_string());
                    flow.update(|f| f.finish_verify(false));
                }
                Err(e) => {
                    toasts.error(format!("Failed to verify OTP: {e}"));
                    flow.update(|f| f.finish_verify(false));
                }
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        if !flow.get_untracked().verified() {
            toasts.error("Please verify your email with OTP before signing up.");
            return;
        }
        if signing_up.get_untracked() {
            toasts.info("Signup already in progress...");
            return;
        }

        let name_val = name.get_untracked();
        let dob_val = dob.get_untracked();

        signing_up.set(true);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.signup(&name_val, &dob_val).await;

            // Settle the in-flight guard before any navigation tears the
            // form down.
            signing_up.set(false);

            match result {
                Ok(res) if res.success => {
                    toasts.success(res.msg_or("Signup successful").to_string());
                    navigate.with_value(|nav| nav("/notes", Default::default()));
                }
                Ok(res) => {
                    toasts.error(res.msg_or("Signup failed").to_string());
                }
                Err(e) => {
                    toasts.error(format!("Failed to signup: {e}"));
                }
            }
        });
    };

    view! {
        <form class="w-full max-w-md space-y-6 py-12 text-center" on:submit=on_submit>
            <div class="mb-2 flex justify-center">
                <span class="text-2xl font-bold">"Quicknotes"</span>
            </div>

            <h2 class="text-3xl font-bold">"Sign up"</h2>
            <p class="text-muted-foreground">"Sign up to enjoy the features of Quicknotes"</p>

            <div class="space-y-4 text-left">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="signup_name" class="text-xs">"Your name"</Label>
                    <Input
                        id="signup_name"
                        r#type="text"
                        name="name"
                        placeholder="Your Name"
                        bind_value=name
                        required=true
                    />
                </div>

                <div class="flex flex-col gap-1.5">
                    <Label html_for="signup_dob" class="text-xs">"Date of birth"</Label>
                    <Input
                        id="signup_dob"
                        r#type="date"
                        name="dob"
                        bind_value=dob
                        required=true
                    />
                </div>

                <div>
                    <Label html_for="signup_email" class="text-xs">"Email"</Label>
                    <Input
                        id="signup_email"
                        r#type="email"
                        name="email"
                        placeholder="Enter your email"
                        bind_value=email
                        required=true
                        class="mt-1.5"
                    />
                    <div class="mt-2 flex justify-end gap-2">
                        <Button
                            size=ButtonSize::Sm
                            attr:r#type="button"
                            attr:disabled=move || flow.get().sending()
                            on:click=on_send_otp
                        >
                            {move || {
                                let f = flow.get();
                                if f.sending() {
                                    "Sending..."
                                } else if f.otp_sent() {
                                    "Resend"
                                } else {
                                    "Send OTP"
                                }
                            }}
                        </Button>
                    </div>
                </div>

                <Show when=move || flow.get().otp_sent() fallback=|| ().into_view()>
                    <div class="flex items-center gap-2">
                        <Input
                            r#type="text"
                            placeholder="Enter OTP"
                            bind_value=otp_input
                            class="flex-1"
                        />
                        <Button
                            variant=ButtonVariant::Success
                            attr:r#type="button"
                            attr:disabled=move || flow.get().verifying()
                            on:click=on_verify_otp
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || flow.get().verifying() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if flow.get().verifying() { "Verifying..." } else { "Verify" }}
                            </span>
                        </Button>
                    </div>
                </Show>
            </div>

            <Button class="w-full">
                {move || if signing_up.get() { "Signing up..." } else { "Sign up" }}
            </Button>

            <p class="text-sm text-muted-foreground">
                "Already have an account? "
                <button
                    type="button"
                    class="text-primary underline-offset-4 hover:underline"
                    on:click=move |_| app_state.0.auth_mode.set(AuthMode::Login)
                >
                    "Sign in"
                </button>
            </p>
        </form>
    }
}

/// Route guard for the notes view.
///
/// Checks the session cookie via `GET /verify` before rendering children;
/// any falsy or failing result redirects to the root route. Advisory only:
/// the server independently enforces access control on every API call.
#[component]
pub fn SessionGuard(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let toasts = expect_context::<Toasts>();
    let navigate = StoredValue::new(use_navigate());

    let checked: RwSignal<bool> = RwSignal::new(false);

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    Effect::new(move |_| {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.verify_session().await {
                Ok(res) if res.success => checked.set(true),
                Ok(res) => {
                    if let Some(msg) = res.msg.filter(|m| !m.is_empty()) {
                        toasts.info(msg);
                    }
                    navigate.with_value(|nav| nav("/", Default::default()));
                }
                Err(e) => {
                    // 401 is the expected "no session" answer; anything else
                    // (network, parse, 5xx) is worth a console trace.
                    if e.kind != ApiErrorKind::Unauthorized {
                        log::error!("session check failed: {e}");
                    }
                    navigate.with_value(|nav| nav("/", Default::default()));
                }
            }
        });
    });

    view! {
        <Show
            when=move || checked.get()
            fallback=move || view! {
                <div class="flex min-h-screen items-center justify-center">
                    <Spinner />
                </div>
            }
        >
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn NotesPage() -> impl IntoView {
    view! {
        <div class="min-h-screen w-full bg-background">
            <WelcomeCard />
            <NotesList />
        </div>
    }
}

#[component]
pub fn WelcomeCard() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let user = app_state.0.current_user;

    // Suppress the state update if this view unmounts before the profile
    // arrives. The request itself is not aborted.
    let alive = StoredValue::new(true);
    on_cleanup(move || alive.set_value(false));

    Effect::new(move |_| {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.me().await {
                Ok(res) => {
                    if !alive.try_get_value().unwrap_or(false) {
                        return;
                    }
                    if res.success {
                        if let Some(u) = res.user {
                            user.set(Some(u));
                        }
                    }
                }
                Err(e) => log::error!("failed to load profile: {e}"),
            }
        });
    });

    view! {
        <div class="flex items-center justify-center p-4">
            <Show
                when=move || user.get().is_some()
                fallback=|| view! { <p class="text-muted-foreground">"Loading..."</p> }
            >
                {move || {
                    user.get().map(|u| {
                        view! {
                            <Card class="w-full max-w-md text-center">
                                <CardHeader class="items-center">
                                    <CardTitle class="text-2xl">
                                        {format!("Hey, {} \u{1f44b}", u.name)}
                                    </CardTitle>
                                    <CardDescription class="text-xs">
                                        "Welcome back, here are your details:"
                                    </CardDescription>
                                </CardHeader>
                                <CardContent class="space-y-2 text-left text-sm">
                                    <div>
                                        <span class="font-semibold">"Email: "</span>
                                        {u.email.clone()}
                                    </div>
                                    <Show
                                        when={
                                            let has_dob = u.dob.is_some();
                                            move || has_dob
                                        }
                                        fallback=|| ().into_view()
                                    >
                                        <div>
                                            <span class="font-semibold">"DOB: "</span>
                                            {u.dob.clone().unwrap_or_default()}
                                        </div>
                                    </Show>
                                </CardContent>
                            </Card>
                        }
                    })
                }}
            </Show>
        </div>
    }
}

#[component]
pub fn NotesList() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let notes = app_state.0.notes;

    let new_note: RwSignal<String> = RwSignal::new(String::new());
    let edit_note_id: RwSignal<Option<String>> = RwSignal::new(None);
    let edit_content: RwSignal<String> = RwSignal::new(String::new());

    // Unconditional full re-fetch: the latest server snapshot always wins
    // over any local delta. Stale responses are dropped by request id.
    let refetch = move || {
        let req_id = app_state
            .0
            .notes_request_id
            .get_untracked()
            .saturating_add(1);
        app_state.0.notes_request_id.set(req_id);
        app_state.0.notes_loading.set(true);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.all_notes().await;

            if app_state.0.notes_request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(res) if res.success => app_state.0.notes.set(res.all_notes),
                // Business failure on list ops has no user-visible surface.
                Ok(_) => {}
                Err(e) => log::error!("failed to fetch notes: {e}"),
            }
            app_state.0.notes_loading.set(false);
        });
    };

    Effect::new(move |_| refetch());

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let content = new_note.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.create_note(&content).await {
                Ok(res) if res.success => {
                    new_note.set(String::new());
                    refetch();
                }
                Ok(_) => {}
                Err(e) => log::error!("failed to create note: {e}"),
            }
        });
    };

    let on_save_edit = move |note_id: String| {
        let content = edit_content.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.edit_note(&note_id, &content).await {
                Ok(res) if res.success => {
                    edit_note_id.set(None);
                    edit_content.set(String::new());
                    refetch();
                }
                Ok(_) => {}
                Err(e) => log::error!("failed to edit note: {e}"),
            }
        });
    };

    let on_delete = move |note_id: String| {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_note(&note_id).await {
                Ok(res) if res.success => refetch(),
                Ok(_) => {}
                Err(e) => log::error!("failed to delete note: {e}"),
            }
        });
    };

    view! {
        <div class="w-full p-4">
            <h1 class="mb-4 text-2xl font-bold">"Your Notes"</h1>

            <form class="mb-4 flex gap-2" on:submit=on_add>
                <Textarea
                    placeholder="Add a new note"
                    bind_value=new_note
                    class="flex-1"
                />
                <Button class="h-fit self-start">"Add"</Button>
            </form>

            <Show
                when=move || !notes.get().is_empty()
                fallback=move || view! {
                    <p class="text-muted-foreground">
                        {move || if app_state.0.notes_loading.get() {
                            "Loading notes..."
                        } else {
                            "No notes yet"
                        }}
                    </p>
                }
            >
                <div class="grid grid-cols-1 gap-2 sm:grid-cols-2 md:grid-cols-3">
                    {move || {
                        notes
                            .get()
                            .into_iter()
                            .map(|note| {
                                let id = note.id.clone();
                                let content = note.content.clone();
                                let created_at = note.created_at.clone();

                                let id_for_is_editing = id.clone();
                                let id_for_save = id.clone();
                                let id_for_edit = id.clone();
                                let id_for_delete = id.clone();
                                let content_for_edit = content.clone();

                                let is_editing = move || {
                                    edit_note_id.get().as_deref() == Some(id_for_is_editing.as_str())
                                };

                                view! {
                                    <Card class="flex flex-col gap-2 rounded-md p-3">
                                        <Show
                                            when=is_editing
                                            fallback={
                                                let content = content.clone();
                                                let created_at = created_at.clone();
                                                let id_for_edit = id_for_edit.clone();
                                                let content_for_edit = content_for_edit.clone();
                                                let id_for_delete = id_for_delete.clone();
                                                move || {
                                                    let id_for_edit = id_for_edit.clone();
                                                    let content_for_edit = content_for_edit.clone();
                                                    let id_for_delete = id_for_delete.clone();
                                                    view! {
                                                        <span class="w-full whitespace-pre-wrap break-words text-sm">
                                                            {content.clone()}
                                                        </span>
                                                        <span class="text-xs text-muted-foreground">
                                                            {created_at.clone()}
                                                        </span>
                                                        <div class="flex gap-1">
                                                            <Button
                                                                size=ButtonSize::Sm
                                                                variant=ButtonVariant::Secondary
                                                                on:click=move |_| {
                                                                    edit_note_id.set(Some(id_for_edit.clone()));
                                                                    edit_content.set(content_for_edit.clone());
                                                                }
                                                            >
                                                                "Edit"
                                                            </Button>
                                                            <Button
                                                                size=ButtonSize::Sm
                                                                variant=ButtonVariant::Destructive
                                                                on:click=move |_| on_delete(id_for_delete.clone())
                                                            >
                                                                "Delete"
                                                            </Button>
                                                        </div>
                                                    }
                                                }
                                            }
                                        >
                                            {
                                                let id_for_save = id_for_save.clone();
                                                move || {
                                                    let id_for_save = id_for_save.clone();
                                                    view! {
                                                        <Textarea
                                                            bind_value=edit_content
                                                            rows=3
                                                            class="flex-1"
                                                        />
                                                        <div class="flex gap-1">
                                                            <Button
                                                                size=ButtonSize::Sm
                                                                variant=ButtonVariant::Success
                                                                on:click=move |_| on_save_edit(id_for_save.clone())
                                                            >
                                                                "Save"
                                                            </Button>
                                                            <Button
                                                                size=ButtonSize::Sm
                                                                variant=ButtonVariant::Ghost
                                                                on:click=move |_| edit_note_id.set(None)
                                                            >
                                                                "Cancel"
                                                            </Button>
                                                        </div>
                                                    }
                                                }
                                            }
                                        </Show>
                                    </Card>
                                }
                            })
                            .collect_view()
                    }}
                </div>
            </Show>
        </div>
    }
}
