use std::fmt;

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ToastKind {
    Error,
    Success,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastKind::Error => write!(f, "error"),
            ToastKind::Success => write!(f, "success"),
        }
    }
}

/// A short-lived notification shown after an operation settles
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Toast {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
