use anyhow::{Context, Result, bail};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 10_000;

/// One run seed and the CLI token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub token: String,
}

impl SeedInfo {
    #[must_use]
    pub fn new(seed: u64, token: impl Into<String>) -> Self {
        Self {
            seed,
            token: token.into(),
        }
    }
}

/// Resolve a list of CLI seed arguments into run seeds.
///
/// Supports decimal integers (negative values use their magnitude), `0x` hex
/// literals, and ranges `a..b` (exclusive) or `a..=b` (inclusive). Duplicates
/// keep their first position; an empty list falls back to the default seed.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some(range) = parse_range(token)? {
            pending.extend(range.map(|seed| SeedInfo::new(seed, token.as_str())));
            continue;
        }

        if let Some(seed) = parse_single(token) {
            pending.push(SeedInfo::new(seed, token.as_str()));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen: HashSet<u64> = HashSet::new();
    let mut deduped: Vec<SeedInfo> = pending
        .into_iter()
        .filter(|info| seen.insert(info.seed))
        .collect();

    if deduped.is_empty() {
        deduped.push(SeedInfo::new(DEFAULT_SEED, "default"));
    }

    Ok(deduped)
}

fn parse_single(token: &str) -> Option<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16).ok();
    }
    if let Ok(value) = token.parse::<i64>() {
        return Some(value.unsigned_abs());
    }
    token.parse::<u64>().ok()
}

fn range_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^(\d+|0[xX][0-9a-fA-F]+)\.\.(=?)(\d+|0[xX][0-9a-fA-F]+)$").ok()
        })
        .as_ref()
}

fn parse_range(token: &str) -> Result<Option<std::ops::RangeInclusive<u64>>> {
    let Some(pattern) = range_pattern() else {
        return Ok(None);
    };
    let Some(caps) = pattern.captures(token) else {
        return Ok(None);
    };
    let start = parse_single(&caps[1])
        .with_context(|| format!("seed range start out of bounds: {token}"))?;
    let end = parse_single(&caps[3])
        .with_context(|| format!("seed range end out of bounds: {token}"))?;
    let inclusive = !caps[2].is_empty();

    let last = if inclusive {
        end
    } else if end > start {
        end - 1
    } else {
        bail!("Empty seed range: {token}");
    };
    if last < start {
        bail!("Empty seed range: {token}");
    }
    if last - start >= MAX_RANGE_LEN {
        bail!("Seed range {token} expands past {MAX_RANGE_LEN} seeds");
    }
    Ok(Some(start..=last))
}
