use serde::{Deserialize, Serialize};

/// Account profile returned by `GET /user/me`.
///
/// Created server-side at signup; the client only reads it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct User {
    pub name: String,
    pub email: String,

    /// Date of birth as the backend stores it (ISO `YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
}

/// A single note as returned by `GET /note/all`.
///
/// The client holds only a transient cached list; the server is the
/// source of truth and every mutation is followed by a full re-fetch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    #[serde(rename = "_id")]
    pub id: String,

    pub content: String,

    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}
