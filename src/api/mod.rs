use crate::models::{Note, User};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:3000".to_string();

        // The hosting page may override the backend origin by defining
        // `window.ENV.API_URL` before the wasm bundle loads (see README).
        // `window.ENV.api_url` is accepted too for older deploy scripts.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Server envelope for endpoints that return only an outcome.
///
/// `success:false` inside a 200 response is a business-logic failure,
/// not a transport error; call sites branch on it.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ApiMessage {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ApiMessage {
    /// Server message, or the given fallback when the backend sent none.
    pub fn msg_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.msg.as_deref().filter(|m| !m.is_empty()).unwrap_or(fallback)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct MeResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct NotesResponse {
    pub success: bool,
    #[serde(rename = "allNotes", default)]
    pub all_notes: Vec<Note>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SendOtpRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SignupRequest {
    pub name: String,
    pub dob: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateNoteRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EditNoteRequest {
    pub note_id: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct DeleteNoteRequest {
    pub note_id: String,
}

/// Cookie-session API client.
///
/// Holds only the base URL. The server-managed session cookie is the sole
/// durable credential; every request opts into browser credential forwarding
/// and nothing is persisted client-side.
#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    fn builder(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let req = client.request(method, url);

        // Session cookie travels with every call. The fetch credentials knob
        // only exists on the wasm backend; native builds (host tests) manage
        // cookies at the client level instead.
        #[cfg(target_arch = "wasm32")]
        let req = req.fetch_credentials_include();

        req
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        req: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::execute(self.builder(reqwest::Method::GET, path)).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &impl serde::Serialize,
    ) -> ApiResult<T> {
        Self::execute(self.builder(method, path).json(body)).await
    }

    pub async fn send_otp(&self, email: &str) -> ApiResult<ApiMessage> {
        self.send_json(
            reqwest::Method::POST,
            "/user/otp",
            &SendOtpRequest {
                email: email.to_string(),
            },
        )
        .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResult<ApiMessage> {
        self.send_json(
            reqwest::Method::POST,
            "/user/otp/verify",
            &VerifyOtpRequest {
                email: email.to_string(),
                otp: otp.to_string(),
            },
        )
        .await
    }

    /// Final login call; the OTP verification must already have attached the
    /// session to this browser. No body.
    pub async fn login(&self) -> ApiResult<ApiMessage> {
        Self::execute(self.builder(reqwest::Method::POST, "/user/login")).await
    }

    pub async fn signup(&self, name: &str, dob: &str) -> ApiResult<ApiMessage> {
        self.send_json(
            reqwest::Method::POST,
            "/user/signup",
            &SignupRequest {
                name: name.to_string(),
                dob: dob.to_string(),
            },
        )
        .await
    }

    pub async fn me(&self) -> ApiResult<MeResponse> {
        self.get_json("/user/me").await
    }

    /// Route-guard access check. Advisory only: the server still enforces
    /// access control on every API call.
    pub async fn verify_session(&self) -> ApiResult<ApiMessage> {
        self.get_json("/verify").await
    }

    pub async fn all_notes(&self) -> ApiResult<NotesResponse> {
        self.get_json("/note/all").await
    }

    pub async fn create_note(&self, content: &str) -> ApiResult<ApiMessage> {
        self.send_json(
            reqwest::Method::POST,
            "/note/new",
            &CreateNoteRequest {
                content: content.to_string(),
            },
        )
        .await
    }

    pub async fn edit_note(&self, note_id: &str, content: &str) -> ApiResult<ApiMessage> {
        self.send_json(
            reqwest::Method::PATCH,
            "/note/edit",
            &EditNoteRequest {
                note_id: note_id.to_string(),
                content: content.to_string(),
            },
        )
        .await
    }

    pub async fn delete_note(&self, note_id: &str) -> ApiResult<ApiMessage> {
        self.send_json(
            reqwest::Method::DELETE,
            "/note/delete",
            &DeleteNoteRequest {
                note_id: note_id.to_string(),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_message_parses_with_and_without_msg() {
        let with: ApiMessage =
            serde_json::from_str(r#"{"success":true,"msg":"OTP sent"}"#).expect("should parse");
        assert!(with.success);
        assert_eq!(with.msg_or("fallback"), "OTP sent");

        let without: ApiMessage =
            serde_json::from_str(r#"{"success":false}"#).expect("should parse");
        assert!(!without.success);
        assert_eq!(without.msg_or("Failed to send OTP"), "Failed to send OTP");
    }

    #[test]
    fn api_message_empty_msg_falls_back() {
        let m: ApiMessage =
            serde_json::from_str(r#"{"success":false,"msg":""}"#).expect("should parse");
        assert_eq!(m.msg_or("Invalid OTP"), "Invalid OTP");
    }

    #[test]
    fn me_response_contract_with_optional_dob() {
        let json = r#"{
            "success": true,
            "user": {"name": "Ada", "email": "ada@example.com", "dob": "1990-12-10"}
        }"#;
        let parsed: MeResponse = serde_json::from_str(json).expect("me response should parse");
        let user = parsed.user.expect("user present");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.dob.as_deref(), Some("1990-12-10"));

        let json = r#"{"success": true, "user": {"name": "Bo", "email": "bo@example.com"}}"#;
        let parsed: MeResponse = serde_json::from_str(json).expect("me response should parse");
        assert!(parsed.user.expect("user present").dob.is_none());
    }

    #[test]
    fn me_response_failure_omits_user() {
        let parsed: MeResponse =
            serde_json::from_str(r#"{"success":false}"#).expect("should parse");
        assert!(!parsed.success);
        assert!(parsed.user.is_none());
    }

    #[test]
    fn notes_response_contract_uses_mongo_style_keys() {
        let json = r#"{
            "success": true,
            "allNotes": [
                {"_id": "6512ab", "content": "first", "createdAt": "2026-08-01T10:00:00Z"},
                {"_id": "6512ac", "content": "second", "createdAt": "2026-08-02T10:00:00Z"}
            ]
        }"#;
        let parsed: NotesResponse = serde_json::from_str(json).expect("note list should parse");
        assert!(parsed.success);
        assert_eq!(parsed.all_notes.len(), 2);
        assert_eq!(parsed.all_notes[0].id, "6512ab");
        assert_eq!(parsed.all_notes[1].content, "second");
    }

    #[test]
    fn notes_response_tolerates_missing_list() {
        // Backend omits `allNotes` on some failure paths.
        let parsed: NotesResponse =
            serde_json::from_str(r#"{"success":false}"#).expect("should parse");
        assert!(parsed.all_notes.is_empty());
    }

    #[test]
    fn edit_and_delete_requests_use_snake_case_note_id() {
        let edit = serde_json::to_value(EditNoteRequest {
            note_id: "6512ab".to_string(),
            content: "updated".to_string(),
        })
        .expect("should serialize");
        assert_eq!(edit["note_id"], "6512ab");
        assert_eq!(edit["content"], "updated");

        let del = serde_json::to_value(DeleteNoteRequest {
            note_id: "6512ab".to_string(),
        })
        .expect("should serialize");
        assert_eq!(del["note_id"], "6512ab");
    }

    #[test]
    fn signup_request_carries_only_name_and_dob() {
        // Email is already bound to the session by OTP verification.
        let v = serde_json::to_value(SignupRequest {
            name: "Ada".to_string(),
            dob: "1990-12-10".to_string(),
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"name": "Ada", "dob": "1990-12-10"}));
    }

    #[test]
    fn error_constructors_tag_their_kind() {
        assert_eq!(ApiError::unauthorized().kind, ApiErrorKind::Unauthorized);

        let parse = ApiError::parse("bad json");
        assert_eq!(parse.kind, ApiErrorKind::Parse);
        assert_eq!(parse.to_string(), "bad json");

        let http = ApiError::http(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "boom".to_string(),
            "Request failed",
        );
        assert_eq!(http.kind, ApiErrorKind::Http);
        assert!(http.to_string().contains("500"));
    }

    #[test]
    fn api_client_new() {
        let client = ApiClient::new("http://localhost:3000".to_string());
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
