use crate::error::ChainReadError;
use alloy::primitives::Address;

/// Collapse whitespace, drop response payloads and backtraces, cap the length.
pub fn compact_error_message(message: &str, max_len: usize) -> String {
    let mut raw = message;
    if let Some((prefix, _)) = raw.split_once("Stack backtrace:") {
        raw = prefix;
    }
    let raw = match raw.split_once(" text: ") {
        Some((prefix, _)) => format!("{prefix} text=<omitted>"),
        None => raw.to_string(),
    };

    let mut compact = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.len() > max_len {
        let mut cut = max_len;
        while !compact.is_char_boundary(cut) {
            cut -= 1;
        }
        compact.truncate(cut);
        compact.push_str("...(truncated)");
    }
    compact
}

/// Map a failed `eth_call` onto the read-error taxonomy.
///
/// Reverts and unknown selectors mean the contract has no such view (older contract
/// versions); timeouts and everything else are transport failures.
pub fn classify_call_failure(contract: Address, field: &str, message: &str) -> ChainReadError {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("revert")
        || lowered.contains("method not found")
        || lowered.contains("-32601")
        || lowered.contains("invalid opcode")
    {
        return ChainReadError::MissingField {
            contract,
            field: field.to_string(),
        };
    }
    if lowered.contains("timed out") {
        return ChainReadError::Timeout {
            waited_ms: parse_waited_ms(&lowered).unwrap_or(0),
            context: message.to_string(),
        };
    }
    ChainReadError::Transport(message.to_string())
}

fn parse_waited_ms(message: &str) -> Option<u64> {
    let (_, tail) = message.split_once("timed out after ")?;
    tail.split("ms").next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_error_message_elides_payload_and_backtrace() {
        let raw = "DeserError { err: unknown variant `0x7e`, text: \"{...huge...}\" }\nStack backtrace:\n 0: frame";
        let compact = compact_error_message(raw, 260);
        assert!(compact.contains("text=<omitted>"));
        assert!(!compact.contains("Stack backtrace"));
    }

    #[test]
    fn test_compact_error_message_truncates() {
        let compact = compact_error_message(&"x ".repeat(400), 10);
        assert_eq!(compact, "x x x x x ...(truncated)");
    }

    #[test]
    fn test_classify_call_failure() {
        let contract = Address::repeat_byte(0x11);
        assert_eq!(
            classify_call_failure(contract, "blocksPerYear", "server returned: execution reverted"),
            ChainReadError::MissingField {
                contract,
                field: "blocksPerYear".to_string()
            }
        );
        assert_eq!(
            classify_call_failure(contract, "kink", "eth_call failed on attempt 3/3: timed out after 1500ms"),
            ChainReadError::Timeout {
                waited_ms: 1_500,
                context: "eth_call failed on attempt 3/3: timed out after 1500ms".to_string()
            }
        );
        assert!(matches!(
            classify_call_failure(contract, "kink", "connection refused"),
            ChainReadError::Transport(_)
        ));
    }
}
