/// Characters stripped from every string before comparison
const PUNCTUATION: &[char] = &[
    ',', '.', '?', '!', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}', '-', '_', '/', '\\',
];

/// Strip punctuation and collapse whitespace. Case is preserved.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Absent text normalizes to the empty string
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// A lowercase-folded view of a string that remembers where each folded
/// char came from, so positions found case-insensitively can be mapped back
/// onto the original text.
struct Folded {
    chars: Vec<char>,
    /// Byte offset in the source of the char each folded char came from
    origin: Vec<usize>,
    source_len: usize,
}

impl Folded {
    fn new(s: &str) -> Self {
        let mut chars = Vec::with_capacity(s.len());
        let mut origin = Vec::with_capacity(s.len());
        for (i, c) in s.char_indices() {
            for lc in c.to_lowercase() {
                chars.push(lc);
                origin.push(i);
            }
        }
        Self {
            chars,
            origin,
            source_len: s.len(),
        }
    }

    /// Source byte offset of folded index `k`, if `k` falls on a source char boundary
    fn byte_at(&self, k: usize) -> Option<usize> {
        if k == self.chars.len() {
            return Some(self.source_len);
        }
        if k > 0 && self.origin[k - 1] == self.origin[k] {
            return None;
        }
        Some(self.origin[k])
    }
}

fn fold(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive equality
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

/// Byte length of the leading part of `s` that equals `prefix` ignoring case
pub fn strip_prefix_ignore_case(s: &str, prefix: &str) -> Option<usize> {
    let hay = Folded::new(s);
    let needle = fold(prefix);
    if needle.len() > hay.chars.len() || hay.chars[..needle.len()] != needle[..] {
        return None;
    }
    hay.byte_at(needle.len())
}

/// Byte offset where a trailing part of `s` equal to `suffix` ignoring case begins
pub fn strip_suffix_ignore_case(s: &str, suffix: &str) -> Option<usize> {
    let hay = Folded::new(s);
    let needle = fold(suffix);
    if needle.len() > hay.chars.len() {
        return None;
    }
    let start = hay.chars.len() - needle.len();
    if hay.chars[start..] != needle[..] {
        return None;
    }
    hay.byte_at(start)
}

/// First case-insensitive occurrence of `needle` in `haystack`, as a byte range of `haystack`
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let hay = Folded::new(haystack);
    let needle = fold(needle);
    if needle.len() > hay.chars.len() {
        return None;
    }
    (0..=hay.chars.len() - needle.len()).find_map(|k| {
        if hay.chars[k..k + needle.len()] != needle[..] {
            return None;
        }
        let start = hay.byte_at(k)?;
        let end = hay.byte_at(k + needle.len())?;
        Some((start, end))
    })
}
