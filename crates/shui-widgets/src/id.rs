//! Process-wide element id generation.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Return the next id from a process-wide counter. Never repeats.
pub fn generate_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Format a fresh id under `prefix`, e.g. `shui-menu-7`.
pub fn prefixed(prefix: &str) -> String {
    format!("{prefix}-{}", generate_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let a = generate_id();
        let b = generate_id();
        assert!(b > a);
    }

    #[test]
    fn prefixed_ids_are_distinct() {
        let a = prefixed("shui-menu");
        let b = prefixed("shui-menu");
        assert!(a.starts_with("shui-menu-"));
        assert_ne!(a, b);
    }
}
