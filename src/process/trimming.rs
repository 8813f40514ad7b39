// src/process/trimming.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Bracketed footnote spans such as `[1]`, `[a]` or `[note 3]`.
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("reference regex should be valid"));

/// A dagger (`†`) decoded as cp1252: `â€` plus a space or no-break space.
static DAGGER: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{e2}\u{20ac}[ \u{a0}]").expect("dagger regex should be valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

/// Remove footnote markers and the mis-encoded dagger, then trim.
///
/// Removal repeats until nothing matches, since deleting one marker can
/// splice together the pieces of another. That makes the function idempotent.
pub fn strip_references(s: &str) -> String {
    let mut current = s.to_string();
    loop {
        let without_refs = REFERENCE.replace_all(&current, "");
        let next = DAGGER.replace_all(&without_refs, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

/// Collapse whitespace runs to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_footnotes_and_dagger() {
        assert_eq!(strip_references("Feb 12, 2023[1]"), "Feb 12, 2023");
        assert_eq!(strip_references("  Fox[a][note 2] "), "Fox");
        assert_eq!(strip_references("Final\u{e2}\u{20ac} "), "Final");
        assert_eq!(strip_references("Final\u{e2}\u{20ac}\u{a0}(UK)"), "Final(UK)");
        assert_eq!(strip_references("no markers"), "no markers");
        assert_eq!(strip_references("unclosed [bracket"), "unclosed [bracket");
    }

    #[test]
    fn stripping_is_idempotent() {
        let samples = [
            "",
            "   ",
            "[[a]]b",
            "a[b[c]d]e",
            "\u{e2}\u{20ac}\u{e2}\u{20ac}  x",
            "\u{e2}\u{20ac}[1] tail",
            "x[1]\n[2",
            "[\n]",
            "Super Bowl LVII[3][4] ",
            "115.1 million\u{e2}\u{20ac} ",
        ];
        for s in samples {
            let once = strip_references(s);
            assert_eq!(strip_references(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  Super \t Bowl\nLVII "), "Super Bowl LVII");
        assert_eq!(collapse_whitespace(""), "");
    }
}
