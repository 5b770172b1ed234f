/// The authenticated account
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub username: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            id: None,
        }
    }
}

/// Bearer credential issued by `POST /token`
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub access_token: String,
    #[cfg_attr(feature = "serde", serde(default = "default_token_type"))]
    pub token_type: String,
}

#[cfg(feature = "serde")]
fn default_token_type() -> String {
    "bearer".to_string()
}

impl Token {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
        }
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}
