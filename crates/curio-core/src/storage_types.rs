use std::fmt::{Display, Formatter, Result as FmtResult};

/// Media backend types
///
/// Which media backend serves uploads. It's defined in core because it's used
/// in configuration and by the storage factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackendKind {
    Cloud,
    Local,
}

impl Display for MediaBackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaBackendKind::Cloud => write!(f, "cloud"),
            MediaBackendKind::Local => write!(f, "local"),
        }
    }
}
