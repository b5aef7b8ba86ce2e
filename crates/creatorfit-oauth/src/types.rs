use serde::Deserialize;

/// Result of the code-for-token exchange.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Instagram returns this as a number; kept as text.
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    /// Sent either as a list or a comma-separated string.
    #[serde(default, deserialize_with = "string_or_list")]
    pub permissions: Vec<String>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[redacted]")
            .field("user_id", &self.user_id)
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Newer token responses wrap the token in a one-element `data` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TokenResponse {
    Wrapped { data: Vec<AccessToken> },
    Flat(AccessToken),
}

/// Fields read from `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramProfile {
    pub id: String,
    pub username: Option<String>,
    pub account_type: Option<String>,
    pub media_count: Option<i64>,
}

/// Error body shape shared by the OAuth and Graph endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error_message: Option<String>,
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Joined(s) => s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
        Raw::List(list) => list,
    })
}
