//! Prefix/suffix string diff for captured output.
//!
//! The two strings are split into a shared prefix, a differing middle on each
//! side, and a shared suffix. The middles are wrapped in highlight tags, and
//! spaces are swapped for a visible marker so whitespace-only differences
//! still show up.

/// Opening tag for the expected side's differing span.
pub const EXPECTED_MARK: &str = "<green>";
/// Opening tag for the actual side's differing span.
pub const ACTUAL_MARK: &str = "<red>";
pub const RESET_MARK: &str = "<reset>";
/// Replacement for every literal space in a rendered diff.
pub const SPACE_MARKER: &str = "<reset><bgYellow>.<reset>";

const RAW_ESCAPE: &str = "\x1b[";
const ESCAPED_ESCAPE: &str = "<gray>\\033[<reset>\x1b[";

/// Rendered diff: both sides carry markup tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDiff {
    pub old: String,
    pub new: String,
}

/// The raw pieces of a diff, before any markup is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub prefix: &'a str,
    pub old_middle: &'a str,
    pub new_middle: &'a str,
    pub suffix: &'a str,
}

/// Splits two strings around their common prefix and common suffix.
///
/// Lengths are counted in bytes and then moved back to the nearest UTF-8
/// boundary. The suffix never overlaps the prefix of the shorter string.
///
/// ```rust
/// use verity::diff::split;
/// let s = split("hello world", "hello earth");
/// assert_eq!(s.prefix, "hello ");
/// assert_eq!((s.old_middle, s.new_middle), ("world", "earth"));
/// assert_eq!(s.suffix, "");
/// ```
pub fn split<'a>(old: &'a str, new: &'a str) -> Split<'a> {
    let (ob, nb) = (old.as_bytes(), new.as_bytes());

    let mut prefix = ob.iter().zip(nb).take_while(|(a, b)| a == b).count();
    while !old.is_char_boundary(prefix) || !new.is_char_boundary(prefix) {
        prefix -= 1;
    }

    let mut suffix = ob
        .iter()
        .rev()
        .zip(nb.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
        .min(ob.len().min(nb.len()) - prefix);
    while !old.is_char_boundary(ob.len() - suffix) || !new.is_char_boundary(nb.len() - suffix) {
        suffix -= 1;
    }

    let old_end = ob.len() - suffix;
    let new_end = nb.len() - suffix;
    Split {
        prefix: &new[..prefix],
        old_middle: &old[prefix..old_end],
        new_middle: &new[prefix..new_end],
        suffix: &new[new_end..],
    }
}

/// Renders diffs; `mark_spaces` controls the whitespace pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDiffer {
    pub mark_spaces: bool,
}

impl Default for TextDiffer {
    fn default() -> Self {
        Self { mark_spaces: true }
    }
}

impl TextDiffer {
    pub fn diff(&self, expected: &str, actual: &str) -> TextDiff {
        let old = escape_raw_sequences(expected);
        let new = escape_raw_sequences(actual);
        let parts = split(&old, &new);

        let old = format!(
            "{}{}{}{}{}",
            parts.prefix, EXPECTED_MARK, parts.old_middle, RESET_MARK, parts.suffix
        );
        let new = format!(
            "{}{}{}{}{}",
            parts.prefix, ACTUAL_MARK, parts.new_middle, RESET_MARK, parts.suffix
        );

        if self.mark_spaces {
            TextDiff {
                old: old.replace(' ', SPACE_MARKER),
                new: new.replace(' ', SPACE_MARKER),
            }
        } else {
            TextDiff { old, new }
        }
    }
}

/// Diffs `expected` against `actual` with the default settings.
pub fn diff(expected: &str, actual: &str) -> TextDiff {
    TextDiffer::default().diff(expected, actual)
}

/// Makes raw terminal escape sequences show up literally in a report.
fn escape_raw_sequences(text: &str) -> String {
    text.replace(RAW_ESCAPE, ESCAPED_ESCAPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_empty_middles() {
        let s = split("same", "same");
        assert_eq!(s.prefix, "same");
        assert_eq!(s.old_middle, "");
        assert_eq!(s.new_middle, "");
        assert_eq!(s.suffix, "");
    }

    #[test]
    fn disjoint_strings() {
        let s = split("abc", "xyz");
        assert_eq!(s.prefix, "");
        assert_eq!(s.old_middle, "abc");
        assert_eq!(s.new_middle, "xyz");
        assert_eq!(s.suffix, "");
    }

    #[test]
    fn common_suffix() {
        let s = split("total: 10 items", "total: 12 items");
        assert_eq!(s.prefix, "total: 1");
        assert_eq!(s.old_middle, "0");
        assert_eq!(s.new_middle, "2");
        assert_eq!(s.suffix, " items");
    }

    #[test]
    fn overlapping_prefix_and_suffix_are_clamped() {
        let s = split("aa", "aaa");
        assert_eq!(s.prefix, "aa");
        assert_eq!(s.old_middle, "");
        assert_eq!(s.new_middle, "a");
        assert_eq!(s.suffix, "");
    }

    #[test]
    fn multibyte_boundaries() {
        let s = split("caf\u{e9}", "caf\u{e8}");
        assert_eq!(s.prefix, "caf");
        assert_eq!(s.old_middle, "\u{e9}");
        assert_eq!(s.new_middle, "\u{e8}");
    }

    #[test]
    fn rendered_markup() {
        let d = TextDiffer { mark_spaces: false }.diff("ab", "ac");
        assert_eq!(d.old, "a<green>b<reset>");
        assert_eq!(d.new, "a<red>c<reset>");
    }

    #[test]
    fn spaces_are_marked() {
        let d = diff("a b", "a  b");
        assert_eq!(
            d.new,
            "a<reset><bgYellow>.<reset><red><reset><bgYellow>.<reset><reset>b"
        );
    }

    #[test]
    fn raw_escapes_are_shown() {
        let d = TextDiffer { mark_spaces: false }.diff("\x1b[1mx", "y");
        assert!(d.old.contains("<gray>\\033[<reset>"));
    }
}
