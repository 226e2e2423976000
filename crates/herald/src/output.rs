//! Terminal output utilities
//!
//! Machine-readable results go to stdout; status lines go to stderr so
//! `herald sign ... | pbcopy` stays clean.

use console::style;

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    eprintln!("  {}: {}", style(key).dim(), value);
}
