//! Pure string matching used by conflict detection and bone resolution.

/// Classic Levenshtein distance with unit insert/delete/substitute costs.
///
/// Operates on `char`s, not bytes; bone names are frequently non-ASCII.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = previous[j] + usize::from(ca != cb);
            let insert = current[j] + 1;
            let delete = previous[j + 1] + 1;
            current[j + 1] = substitute.min(insert).min(delete);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Glob match with `*` (any run, possibly empty) and `?` (any single char).
/// Every other character matches itself, case-sensitively.
pub(crate) fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let mut p = 0usize;
    let mut n = 0usize;
    let mut star: Option<usize> = None;
    let mut star_n = 0usize;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_n = n;
            p += 1;
        } else if let Some(s) = star {
            // Backtrack: let the last `*` swallow one more char.
            p = s + 1;
            star_n += 1;
            n = star_n;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// Strips a leading `prefix` and a trailing `suffix` from `name` when
/// present. Empty affixes strip nothing.
pub(crate) fn strip_affixes<'a>(name: &'a str, prefix: &str, suffix: &str) -> &'a str {
    let mut out = name;
    if !prefix.is_empty() {
        if let Some(rest) = out.strip_prefix(prefix) {
            out = rest;
        }
    }
    if !suffix.is_empty() {
        if let Some(rest) = out.strip_suffix(suffix) {
            out = rest;
        }
    }
    out
}
