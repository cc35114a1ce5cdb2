//! Pending migration selection.
//!
//! A name is a candidate when it matches `^<digits>(_.*)?\.sql$`
//! (case-insensitive). Its digit prefix decides whether it is newer than the
//! ledger's current version; the identifier actually recorded comes from the
//! script header and may differ.

use regex::Regex;
use std::sync::OnceLock;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"(?i)^(\d+)(?:_.*)?\.sql$").expect("valid regex"))
}

/// Extract the numeric prefix of a candidate migration name.
///
/// Returns `None` for names that are not candidates, including prefixes too
/// large for an `i64`.
pub fn name_prefix(name: &str) -> Option<i64> {
    let caps = name_regex().captures(name)?;
    caps[1].parse::<i64>().ok()
}

/// Select the names that must run after `current`, in execution order.
///
/// Non-candidate names are skipped silently. Duplicates collapse to one entry.
pub fn select_pending<I, S>(names: I, current: i64) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pending: Vec<String> = names
        .into_iter()
        .filter(|name| name_prefix(name.as_ref()).is_some_and(|prefix| prefix > current))
        .map(|name| name.as_ref().to_string())
        .collect();
    order_pending(&mut pending);
    pending
}

/// Order pending names by plain string comparison of the whole name.
///
/// Unpadded prefixes of different widths misorder (`10_x.sql` sorts before
/// `2_x.sql`); zero-padded or fixed-width timestamp names are unaffected.
fn order_pending(names: &mut Vec<String>) {
    names.sort();
    names.dedup();
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
