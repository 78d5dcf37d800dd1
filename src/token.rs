//! Reference token escaping
//!
//! Pointer path segments may contain characters that double as path
//! syntax. The escaping table extends standard JSON Pointer escaping
//! (`~`, `/`) with `#` and `.`, since fragments are also split on the
//! dotted compatibility style. Substitutions are applied in registration
//! order on encode and reversed in the opposite order on decode, so
//! re-expansion is never ambiguous.

/// Escaping table, in registration order. The `~` entry must stay first:
/// every replacement token starts with `~`, so raw tildes are rewritten
/// before any other substitution can see them.
const ESCAPES: [(char, &str); 4] = [('~', "~0"), ('/', "~1"), ('#', "~2"), ('.', "~3")];

/// Escape a property name for use as a pointer path segment.
pub fn encode(segment: &str) -> String {
    let mut encoded = segment.to_string();
    for (raw, escaped) in ESCAPES {
        encoded = encoded.replace(raw, escaped);
    }
    encoded
}

/// Reverse [`encode`], applying substitutions in the opposite order.
pub fn decode(segment: &str) -> String {
    let mut decoded = segment.to_string();
    for (raw, escaped) in ESCAPES.iter().rev() {
        decoded = decoded.replace(escaped, &raw.to_string());
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segment_passes_through() {
        assert_eq!(encode("address"), "address");
        assert_eq!(decode("address"), "address");
    }

    #[test]
    fn test_extended_escaping_table() {
        assert_eq!(encode("com/vsv#..."), "com~1vsv~2~3~3~3");
        assert_eq!(decode("com~1vsv~2~3~3~3"), "com/vsv#...");
    }

    #[test]
    fn test_round_trip_all_special_characters() {
        for segment in ["~", "/", "#", ".", "~0", "~1", "a~/b#.c", "~~//##..", "x~1y"] {
            assert_eq!(decode(&encode(segment)), segment, "round trip of {segment:?}");
        }
    }

    #[test]
    fn test_literal_escape_sequences_survive() {
        // A name that already looks like an escape must not re-expand.
        assert_eq!(encode("~1"), "~01");
        assert_eq!(decode("~01"), "~1");
    }
}
