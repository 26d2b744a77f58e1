use std::fmt;

use thiserror::Error;

/// JSON-RPC code a wallet returns when the user declines a prompt.
pub const CODE_USER_REJECTED: i64 = 4001;

/// JSON-RPC code a wallet returns for a chain it has never been told about.
pub const CODE_UNKNOWN_CHAIN: i64 = 4902;

/// JSON-RPC code for a request that is already waiting on the user.
pub const CODE_REQUEST_PENDING: i64 = -32002;

const REJECTED_REASON: &str = "ACTION_REJECTED";
const DENIED_MARKER: &str = "User denied transaction signature";

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// An error as reported by the wallet provider or the RPC node behind it.
///
/// Providers are inconsistent about where they put the useful part: some
/// set a numeric code, some a reason string, and some wrap the node's
/// revert message inside a nested payload. All three are kept so that
/// [`ProviderError::kind`] can decide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderError {
    /// Numeric JSON-RPC / EIP-1193 code, if any.
    pub code: Option<i64>,
    /// Top-level message.
    pub message: String,
    /// Library-level reason string (e.g. `ACTION_REJECTED`).
    pub reason: Option<String>,
    /// Message found inside the error's data payload.
    pub nested: Option<String>,
}

/// Classification of a [`ProviderError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The user declined the wallet prompt.
    UserRejected,
    /// A request of the same kind is already waiting in the wallet.
    AlreadyPending,
    /// The wallet does not know the requested chain.
    UnknownChain,
    /// The provider reported a denied signature in its message text.
    Denied,
    /// The node returned a nested message (usually a revert).
    Nested(String),
    /// Anything else.
    Other,
}

impl ProviderError {
    /// Create an error carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Create an error with a numeric code.
    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach a library-level reason string.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach a nested payload message.
    #[must_use]
    pub fn nested(mut self, nested: impl Into<String>) -> Self {
        self.nested = Some(nested.into());
        self
    }

    /// The user declined the prompt.
    pub fn user_rejected() -> Self {
        Self::with_code(CODE_USER_REJECTED, "User rejected the request.")
    }

    /// Classify this error. Checks run in priority order.
    pub fn kind(&self) -> ProviderErrorKind {
        match self.code {
            Some(CODE_USER_REJECTED) => return ProviderErrorKind::UserRejected,
            Some(CODE_REQUEST_PENDING) => return ProviderErrorKind::AlreadyPending,
            Some(CODE_UNKNOWN_CHAIN) => return ProviderErrorKind::UnknownChain,
            _ => {}
        }
        if self.reason.as_deref() == Some(REJECTED_REASON) {
            return ProviderErrorKind::UserRejected;
        }
        if self.message.contains(DENIED_MARKER) {
            return ProviderErrorKind::Denied;
        }
        match &self.nested {
            Some(nested) => ProviderErrorKind::Nested(nested.clone()),
            None => ProviderErrorKind::Other,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no wallet provider found, set WALLET_PRIVATE_KEY to enable one")]
    WalletNotFound,

    #[error("no accounts found")]
    NoAccounts,

    #[error("contracts not initialized")]
    ContractsNotInitialized,

    #[error("network setup failed: {0}")]
    Network(#[source] ProviderError),

    #[error("wallet connection failed: {0}")]
    Connect(#[source] ProviderError),

    #[error("transaction submission failed: {0}")]
    Dispatch(#[source] ProviderError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the activity console already showed this error to the
    /// operator. Only configuration errors happen before the console exists.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Error::Config(_))
    }

    /// Short operator-facing text for this error, as shown in the activity log.
    pub fn user_message(&self) -> String {
        match self {
            Error::WalletNotFound => {
                "No wallet found. Configure a wallet key to continue.".to_string()
            }
            Error::NoAccounts => "No accounts found in the wallet.".to_string(),
            Error::ContractsNotInitialized => "Contracts not initialized.".to_string(),
            Error::Network(e) | Error::Connect(e) => match e.kind() {
                ProviderErrorKind::UserRejected => {
                    "Connection request rejected. Please approve it in your wallet.".to_string()
                }
                ProviderErrorKind::AlreadyPending => {
                    "A connection request is already pending. Check your wallet.".to_string()
                }
                _ => format!("Failed to connect wallet: {}", e.message),
            },
            Error::Dispatch(e) => match e.kind() {
                ProviderErrorKind::UserRejected => "You rejected the transaction.".to_string(),
                ProviderErrorKind::Denied => "You denied the transaction.".to_string(),
                ProviderErrorKind::Nested(nested) => crate::domain::sanitize(&nested),
                _ => "Transaction was rejected.".to_string(),
            },
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_4001_is_user_rejected() {
        assert_eq!(ProviderError::user_rejected().kind(), ProviderErrorKind::UserRejected);
    }

    #[test]
    fn reason_string_is_user_rejected() {
        let err = ProviderError::message("user rejected transaction").reason("ACTION_REJECTED");
        assert_eq!(err.kind(), ProviderErrorKind::UserRejected);
    }

    #[test]
    fn code_takes_priority_over_nested() {
        let err = ProviderError::with_code(4902, "Unrecognized chain").nested("ignored");
        assert_eq!(err.kind(), ProviderErrorKind::UnknownChain);
    }

    #[test]
    fn pending_request_is_classified() {
        let err = ProviderError::with_code(-32002, "Already processing eth_requestAccounts");
        assert_eq!(err.kind(), ProviderErrorKind::AlreadyPending);
    }

    #[test]
    fn denied_marker_in_message() {
        let err = ProviderError::message(
            "MetaMask Tx Signature: User denied transaction signature.",
        );
        assert_eq!(err.kind(), ProviderErrorKind::Denied);
    }

    #[test]
    fn dispatch_messages_by_kind() {
        assert_eq!(
            Error::Dispatch(ProviderError::user_rejected()).user_message(),
            "You rejected the transaction."
        );
        assert_eq!(
            Error::Dispatch(ProviderError::message("User denied transaction signature"))
                .user_message(),
            "You denied the transaction."
        );
        assert_eq!(
            Error::Dispatch(
                ProviderError::with_code(-32603, "Internal JSON-RPC error.")
                    .nested("execution reverted: no profit")
            )
            .user_message(),
            "Transaction failed: no profit"
        );
        assert_eq!(
            Error::Dispatch(ProviderError::message("boom")).user_message(),
            "Transaction was rejected."
        );
    }

    #[test]
    fn only_config_errors_are_unreported() {
        let config = Error::Config(ConfigError::MissingField { field: "wallet.rpc_url" });
        assert!(!config.is_reported());
        assert!(Error::WalletNotFound.is_reported());
        assert!(Error::Dispatch(ProviderError::user_rejected()).is_reported());
    }

    #[test]
    fn connect_messages_by_kind() {
        assert!(Error::Connect(ProviderError::user_rejected())
            .user_message()
            .contains("rejected"));
        assert!(Error::Connect(ProviderError::with_code(-32002, "pending"))
            .user_message()
            .contains("already pending"));
        assert_eq!(
            Error::Network(ProviderError::with_code(-32603, "rpc down")).user_message(),
            "Failed to connect wallet: rpc down"
        );
    }
}
