use std::fs;
use std::path::Path;

const REQUIRED_VARS: &[&str] = &["RPC_URL", "NETWORK"];

/// Parses one `.env` line into a key/value pair; comments, blanks and malformed lines
/// yield `None`. Surrounding single or double quotes are stripped from the value.
pub fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim().trim_start_matches("export ").trim();
    if key.is_empty() {
        return None;
    }

    let value_no_comment = value.split('#').next().unwrap_or("").trim();
    let parsed = if value_no_comment.len() >= 2
        && ((value_no_comment.starts_with('"') && value_no_comment.ends_with('"'))
            || (value_no_comment.starts_with('\'') && value_no_comment.ends_with('\'')))
    {
        &value_no_comment[1..value_no_comment.len() - 1]
    } else {
        value_no_comment
    };
    Some((key, parsed))
}

/// Exports every `.env` entry not already set in the process environment.
fn load_dot_env(path: &Path) {
    if !path.exists() {
        return;
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[ENV] Failed to read {}: {}", path.display(), e);
            return;
        }
    };

    for (key, value) in content.lines().filter_map(parse_env_line) {
        if std::env::var_os(key).is_some() {
            continue;
        }
        std::env::set_var(key, value);
    }
}

/// Loads `.env` and warns (to stderr, before logging is installed) about missing keys.
pub fn harden_env_setup() {
    harden_env_setup_in(Path::new("."));
}

/// Same as `harden_env_setup` for the `.env` in `dir`. Nothing is written to `dir`.
pub fn harden_env_setup_in(dir: &Path) {
    load_dot_env(&dir.join(".env"));
    for key in REQUIRED_VARS {
        if std::env::var(key).is_err() {
            eprintln!("[ENV] WARN: {key} is not set");
        }
    }
}
