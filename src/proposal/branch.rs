//! Repository paths and branch naming

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of a branch base name
pub const BRANCH_NAME_MAX_LEN: usize = 30;

/// Branch names tried before a collision error is surfaced
pub const MAX_BRANCH_ATTEMPTS: u32 = 15;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Lowercase ASCII slug: non-ASCII text is transliterated first, then runs
/// of other characters become a single `-`
pub fn slugify(input: &str) -> String {
    let lowered = deunicode(input).to_ascii_lowercase();
    NON_ALNUM
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Base branch name for changes to `path_in_repo`
pub fn branch_base_name(path_in_repo: &str) -> String {
    slugify(path_in_repo)
        .chars()
        .take(BRANCH_NAME_MAX_LEN)
        .collect()
}

/// Name tried on the given 1-based attempt
pub fn branch_name(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Each item lives in a directory named after its file stem:
/// `stac_dist` + `a.json` -> `stac_dist/a/a.json`
pub fn path_in_repo(item_type: &str, filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    format!("{}/{}/{}", item_type, stem, filename)
}

/// Split a repository path into parent directory and file name
pub fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}
