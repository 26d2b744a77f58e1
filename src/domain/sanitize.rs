//! Turns raw provider text into something safe to show the operator.
//!
//! Rules are tried in order and the first match wins. Unrecognised text
//! is never echoed back; it collapses to a fixed fallback.

const SIGNATURE_PREFIX: &str = "MetaMask Tx Signature: ";
const USER_DENIED_MARKER: &str = "ethers-user-denied";
const REVERTED_MARKER: &str = "execution reverted: ";

pub const ACTION_CANCELLED: &str = "Action cancelled";
pub const TRANSACTION_FAILED: &str = "Transaction failed";

type Rule = fn(&str) -> Option<String>;

const RULES: &[Rule] = &[strip_signature_prefix, user_denied, execution_reverted];

fn strip_signature_prefix(raw: &str) -> Option<String> {
    raw.strip_prefix(SIGNATURE_PREFIX).map(str::to_string)
}

fn user_denied(raw: &str) -> Option<String> {
    raw.contains(USER_DENIED_MARKER)
        .then(|| ACTION_CANCELLED.to_string())
}

fn execution_reverted(raw: &str) -> Option<String> {
    let (_, reason) = raw.split_once(REVERTED_MARKER)?;
    Some(format!("{TRANSACTION_FAILED}: {}", reason.trim()))
}

/// Map a raw provider message to an operator-facing one.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    RULES
        .iter()
        .find_map(|rule| rule(raw))
        .unwrap_or_else(|| TRANSACTION_FAILED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_reason_is_kept() {
        assert_eq!(
            sanitize("execution reverted: insufficient funds"),
            "Transaction failed: insufficient funds"
        );
    }

    #[test]
    fn user_denied_marker_anywhere() {
        assert_eq!(sanitize("ethers-user-denied: foo"), "Action cancelled");
        assert_eq!(sanitize("error [ethers-user-denied: foo]"), "Action cancelled");
    }

    #[test]
    fn unrelated_text_is_hidden() {
        assert_eq!(sanitize("some unrelated provider noise"), "Transaction failed");
        assert_eq!(sanitize(""), "Transaction failed");
    }

    #[test]
    fn signature_prefix_is_stripped() {
        assert_eq!(
            sanitize("MetaMask Tx Signature: nonce too low"),
            "nonce too low"
        );
    }

    #[test]
    fn prefix_rule_wins_over_later_rules() {
        assert_eq!(
            sanitize("MetaMask Tx Signature: execution reverted: x"),
            "execution reverted: x"
        );
    }

    #[test]
    fn denied_beats_reverted() {
        assert_eq!(
            sanitize("ethers-user-denied; execution reverted: x"),
            "Action cancelled"
        );
    }
}
