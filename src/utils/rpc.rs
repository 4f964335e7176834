use crate::error::ConfigError;
use tokio::time::{sleep, timeout, Duration};

const RPC_CALL_TIMEOUT_MS: u64 = 1_500;
const RPC_RETRIES: usize = 3;
const RPC_ERR_MAX_LEN: usize = 260;
const RETRY_BACKOFF_BASE_MS: u64 = 100;
const RETRY_BACKOFF_CAP_MS: u64 = 1_800;
const RATE_LIMIT_BACKOFF_CAP_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: RPC_RETRIES,
            timeout_ms: RPC_CALL_TIMEOUT_MS,
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: usize, timeout_ms: u64) -> Result<Self, ConfigError> {
        if !(1..=8).contains(&attempts) {
            return Err(ConfigError::Invalid(format!(
                "RPC_RETRIES must be within 1..=8, got {attempts}"
            )));
        }
        if !(250..=20_000).contains(&timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "RPC_CALL_TIMEOUT_MS must be within 250..=20000, got {timeout_ms}"
            )));
        }
        Ok(Self {
            attempts,
            timeout_ms,
        })
    }
}

pub fn is_retryable_rpc_error(message: &str) -> bool {
    let msg = message.to_ascii_lowercase();
    let non_retryable = [
        "method not found",
        "-32601",
        "invalid params",
        "-32602",
        "execution reverted",
        "revert",
        "parse error",
        "-32700",
    ];
    !non_retryable.iter().any(|needle| msg.contains(needle))
}

pub fn is_rate_limited_rpc_error(message: &str) -> bool {
    let msg = message.to_ascii_lowercase();
    msg.contains("429")
        || msg.contains("rate limit")
        || msg.contains("too many requests")
        || msg.contains("compute units per second")
}

pub fn bounded_exponential_backoff_ms(base_ms: u64, streak: u32, cap_ms: u64) -> u64 {
    if base_ms == 0 {
        return 0;
    }
    let clamped = streak.min(8);
    base_ms
        .saturating_mul(1u64 << clamped)
        .min(cap_ms.max(base_ms))
}

/// Providers phrase this differently; the value is only a hint for the next backoff.
fn parse_retry_after_ms(message: &str) -> Option<u64> {
    let msg = message.to_ascii_lowercase();
    let start = msg
        .find("retry-after")
        .or_else(|| msg.find("retry after"))?;
    let tail = &msg[start..];

    let digits: String = tail
        .chars()
        .skip_while(|ch| !ch.is_ascii_digit())
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    let value: u64 = digits.parse().ok()?;

    let unit_hint = tail
        .split_once(&digits)
        .map(|(_, suffix)| suffix.trim_start())
        .unwrap_or("");
    if unit_hint.starts_with("ms") || unit_hint.starts_with("millis") {
        return Some(value);
    }
    // HTTP Retry-After is in seconds.
    Some(value.saturating_mul(1_000))
}

fn retry_backoff_ms(attempt: usize, message: &str) -> u64 {
    let backoff = bounded_exponential_backoff_ms(
        RETRY_BACKOFF_BASE_MS,
        attempt as u32,
        RETRY_BACKOFF_CAP_MS,
    );
    if is_rate_limited_rpc_error(message) {
        return backoff
            .max(parse_retry_after_ms(message).unwrap_or(0))
            .min(RATE_LIMIT_BACKOFF_CAP_MS);
    }
    backoff
}

pub fn compact_rpc_error_message(message: &str) -> String {
    crate::utils::error::compact_error_message(message, RPC_ERR_MAX_LEN)
}

/// Run `op` under a per-attempt timeout, retrying transient failures with bounded
/// exponential backoff. Non-retryable messages (reverts, unknown methods) fail at once.
pub async fn run_with_retry<T, Op, Fut>(
    policy: &RetryPolicy,
    context: &str,
    mut op: Op,
) -> anyhow::Result<T>
where
    Op: FnMut() -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
{
    let max_attempts = policy.attempts.max(1);
    let mut last_message = String::new();

    for attempt in 1..=max_attempts {
        match timeout(Duration::from_millis(policy.timeout_ms), op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                let message = compact_rpc_error_message(&err.to_string());
                if !is_retryable_rpc_error(&message) || attempt == max_attempts {
                    return Err(anyhow::anyhow!(
                        "{} failed on attempt {}/{}: {}",
                        context,
                        attempt,
                        max_attempts,
                        message
                    ));
                }
                last_message = message;
            }
            Err(_) => {
                last_message = format!("timed out after {}ms", policy.timeout_ms);
                if attempt == max_attempts {
                    return Err(anyhow::anyhow!(
                        "{} failed on attempt {}/{}: {}",
                        context,
                        attempt,
                        max_attempts,
                        last_message
                    ));
                }
            }
        }

        tracing::debug!(
            "[RPC] {} attempt {}/{} failed: {}; retrying",
            context,
            attempt,
            max_attempts,
            last_message
        );
        sleep(Duration::from_millis(retry_backoff_ms(attempt, &last_message))).await;
    }

    Err(anyhow::anyhow!(
        "{} failed after {} attempt(s): {}",
        context,
        max_attempts,
        last_message
    ))
}
