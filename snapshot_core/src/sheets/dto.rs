use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: Option<String>,
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: Option<u16>,
    pub message: String,
}

/// `credentials.json` as downloaded from the Google Cloud console.
#[derive(Debug, Deserialize)]
pub struct CredentialsFile {
    pub installed: InstalledCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    pub auth_uri: Option<String>,
    pub token_uri: Option<String>,
}

/// `token.json`; `expiry_date` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}
