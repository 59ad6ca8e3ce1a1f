//! Aggregation over completed trials: per-case, per-tier, and overall.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::engine::CaseResults;

/// Rollup for one case across its completed runs.
#[derive(Debug, Clone)]
pub struct CaseStats {
    pub name: String,
    pub tier: u32,
    pub runs: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub avg_score: f64,
    pub avg_attempts: f64,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub llm_time: Duration,
    pub tool_time: Duration,
}

/// Rollup for one difficulty tier.
#[derive(Debug, Clone)]
pub struct TierStats {
    pub tier: u32,
    pub cases: usize,
    pub runs: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub avg_score: f64,
}

/// Whole-run rollup.
#[derive(Debug, Clone, Default)]
pub struct OverallStats {
    pub runs: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub avg_score: f64,
    pub tokens_in: u64,
    pub tokens_out: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-case stats in catalog order.
    pub cases: Vec<CaseStats>,
    /// Per-tier stats, ascending tier.
    pub tiers: Vec<TierStats>,
    pub overall: OverallStats,
}

/// Computes all rollups. Cases whose runs were all cancelled contribute zero
/// completed runs and are excluded from rate denominators.
pub fn summarize(results: &[CaseResults]) -> RunSummary {
    let mut cases = Vec::with_capacity(results.len());

    for cr in results {
        let runs = cr.runs.len();
        let passed = cr.runs.iter().filter(|r| r.passed).count();
        let denom = runs.max(1) as f64;
        cases.push(CaseStats {
            name: cr.case.name.clone(),
            tier: cr.case.tier,
            runs,
            passed,
            pass_rate: passed as f64 / denom,
            avg_score: cr.runs.iter().map(|r| r.score).sum::<f64>() / denom,
            avg_attempts: cr.runs.iter().map(|r| f64::from(r.attempts)).sum::<f64>() / denom,
            tokens_in: cr.runs.iter().map(|r| r.tokens_in).sum(),
            tokens_out: cr.runs.iter().map(|r| r.tokens_out).sum(),
            llm_time: cr.runs.iter().map(|r| r.llm_time).sum(),
            tool_time: cr.runs.iter().map(|r| r.tool_time).sum(),
        });
    }

    let mut by_tier: BTreeMap<u32, Vec<&CaseStats>> = BTreeMap::new();
    for cs in &cases {
        by_tier.entry(cs.tier).or_default().push(cs);
    }

    let mut tiers = Vec::with_capacity(by_tier.len());
    for (tier, tier_cases) in by_tier {
        let runs: usize = tier_cases.iter().map(|c| c.runs).sum();
        let passed: usize = tier_cases.iter().map(|c| c.passed).sum();
        let score_sum: f64 = tier_cases.iter().map(|c| c.avg_score * c.runs as f64).sum();
        let denom = runs.max(1) as f64;
        tiers.push(TierStats {
            tier,
            cases: tier_cases.len(),
            runs,
            passed,
            pass_rate: passed as f64 / denom,
            avg_score: score_sum / denom,
        });
    }

    let runs: usize = cases.iter().map(|c| c.runs).sum();
    let passed: usize = cases.iter().map(|c| c.passed).sum();
    let score_sum: f64 = cases.iter().map(|c| c.avg_score * c.runs as f64).sum();
    let denom = runs.max(1) as f64;
    let overall = OverallStats {
        runs,
        passed,
        pass_rate: passed as f64 / denom,
        avg_score: score_sum / denom,
        tokens_in: cases.iter().map(|c| c.tokens_in).sum(),
        tokens_out: cases.iter().map(|c| c.tokens_out).sum(),
    };

    RunSummary { cases, tiers, overall }
}
