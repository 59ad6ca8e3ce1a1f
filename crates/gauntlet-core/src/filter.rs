//! Case selection: glob filtering over names plus tier filtering.

use globset::Glob;

use crate::catalog::EvalCase;
use crate::errors::ConfigError;

/// Returns the subset of `all` matching the glob pattern and tier spec,
/// preserving catalog order. Empty pattern or spec means "match all".
pub fn filter_cases(
    all: &[EvalCase],
    pattern: &str,
    tier_spec: &str,
) -> Result<Vec<EvalCase>, ConfigError> {
    let tier_range = parse_tier_spec(tier_spec)?;

    let matcher = if pattern.is_empty() {
        None
    } else {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::BadPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Some(glob.compile_matcher())
    };

    Ok(all
        .iter()
        .filter(|c| match tier_range {
            Some((min, max)) => c.tier >= min && c.tier <= max,
            None => true,
        })
        .filter(|c| match &matcher {
            Some(m) => m.is_match(&c.name),
            None => true,
        })
        .cloned()
        .collect())
}

/// Parses "" (all), "N" (single tier), or "N-M" (inclusive range).
/// Tiers are 1-based; zero, inverted ranges, and anything unparsable are
/// configuration errors.
pub fn parse_tier_spec(spec: &str) -> Result<Option<(u32, u32)>, ConfigError> {
    if spec.is_empty() {
        return Ok(None);
    }

    if let Ok(n) = spec.parse::<u32>() {
        if n < 1 {
            return Err(ConfigError::TierOutOfRange { spec: spec.to_string() });
        }
        return Ok(Some((n, n)));
    }

    if let Some((lo, hi)) = spec.split_once('-') {
        if let (Ok(min), Ok(max)) = (lo.parse::<u32>(), hi.parse::<u32>()) {
            if min < 1 || max < 1 {
                return Err(ConfigError::TierOutOfRange { spec: spec.to_string() });
            }
            if min > max {
                return Err(ConfigError::TierInverted { spec: spec.to_string() });
            }
            return Ok(Some((min, max)));
        }
    }

    Err(ConfigError::TierUnparsable { spec: spec.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_cases;

    #[test]
    fn empty_filters_return_all_in_order() {
        let all = builtin_cases();
        let got = filter_cases(&all, "", "").unwrap();
        assert_eq!(got.len(), all.len());
        let names: Vec<_> = got.iter().map(|c| c.name.clone()).collect();
        let want: Vec<_> = all.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, want);
    }

    #[test]
    fn glob_matches_name_substring_pattern() {
        let all = builtin_cases();
        let got = filter_cases(&all, "*prime*", "").unwrap();
        assert!(!got.is_empty());
        assert!(got.iter().all(|c| c.name.contains("prime")));
    }

    #[test]
    fn glob_without_match_yields_empty_selection() {
        let all = builtin_cases();
        let got = filter_cases(&all, "*matrix*", "").unwrap();
        assert!(got.is_empty());
    }

    #[test]
    fn tier_filter_restricts_to_range() {
        let all = builtin_cases();
        let got = filter_cases(&all, "", "1-2").unwrap();
        assert!(!got.is_empty());
        assert!(got.iter().all(|c| c.tier >= 1 && c.tier <= 2));

        let single = filter_cases(&all, "", "3").unwrap();
        assert!(single.iter().all(|c| c.tier == 3));
    }

    #[test]
    fn tier_spec_parse_table() {
        assert_eq!(parse_tier_spec("").unwrap(), None);
        assert_eq!(parse_tier_spec("3").unwrap(), Some((3, 3)));
        assert_eq!(parse_tier_spec("1-4").unwrap(), Some((1, 4)));
        assert!(matches!(
            parse_tier_spec("0"),
            Err(ConfigError::TierOutOfRange { .. })
        ));
        assert!(matches!(
            parse_tier_spec("4-1"),
            Err(ConfigError::TierInverted { .. })
        ));
        assert!(matches!(
            parse_tier_spec("abc"),
            Err(ConfigError::TierUnparsable { .. })
        ));
        assert!(matches!(
            parse_tier_spec("1-x"),
            Err(ConfigError::TierUnparsable { .. })
        ));
    }
}
