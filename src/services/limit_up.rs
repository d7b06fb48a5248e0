use std::collections::HashMap;

use crate::error::AnalysisError;
use crate::models::analysis::{AnalysisResult, Horizon, RankedCandidate};
use crate::models::stock::{DayAggregate, StockSnapshot};
use crate::services::aggregator::{
    round_score, Aggregate, WeightedAggregator, INTRADAY_PROFILE, NEXT_DAY_PROFILE,
};
use crate::services::factors;
use crate::services::labeling::LabelingEngine;

/// 盘中涨停潜力分析
pub struct DailyLimitUpAnalyzer;

impl DailyLimitUpAnalyzer {
    pub fn analyze(snapshot: &StockSnapshot) -> Result<AnalysisResult, AnalysisError> {
        snapshot.validate()?;
        let change_pct = snapshot.price_change_percent();
        let raw = factors::intraday_factors(snapshot);
        let agg = WeightedAggregator::aggregate(&raw, change_pct, &INTRADAY_PROFILE);
        Ok(build_result(snapshot, Horizon::Intraday, agg))
    }
}

/// 次日涨停潜力分析（基于当日汇总）
pub struct NextDayLimitUpAnalyzer;

impl NextDayLimitUpAnalyzer {
    pub fn analyze(snapshot: &StockSnapshot, day: &DayAggregate) -> Result<AnalysisResult, AnalysisError> {
        snapshot.validate()?;
        day.validate()?;
        let change_pct = snapshot.price_change_percent();
        let raw = factors::next_day_factors(snapshot, day);
        let agg = WeightedAggregator::aggregate(&raw, change_pct, &NEXT_DAY_PROFILE);
        Ok(build_result(snapshot, Horizon::NextDay, agg))
    }
}

fn build_result(snapshot: &StockSnapshot, horizon: Horizon, agg: Aggregate) -> AnalysisResult {
    AnalysisResult {
        stock_code: snapshot.code.clone(),
        stock_name: snapshot.name.clone(),
        horizon,
        score: round_score(agg.score),
        probability: round_score(agg.probability),
        factors: agg.factors,
        recommendation: agg.tier.narrative(horizon).to_string(),
        tier: agg.tier,
        risk_level: agg.risk,
    }
}

pub struct LimitUpRanker;

impl LimitUpRanker {
    /// 按概率降序、得分降序、代码升序排名，取前 top_n
    pub fn rank(results: &[AnalysisResult], top_n: usize) -> Vec<AnalysisResult> {
        let mut ranked = results.to_vec();
        ranked.sort_by(|a, b| {
            b.probability
                .cmp(&a.probability)
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| a.stock_code.cmp(&b.stock_code))
        });
        ranked.truncate(top_n);
        ranked
    }

    /// 排名并附带标签；snapshots 中缺失的代码不打标签
    pub fn rank_with_labels(
        results: &[AnalysisResult],
        snapshots: &[StockSnapshot],
        top_n: usize,
    ) -> Vec<RankedCandidate> {
        let by_code: HashMap<&str, &StockSnapshot> =
            snapshots.iter().map(|s| (s.code.as_str(), s)).collect();

        Self::rank(results, top_n)
            .into_iter()
            .enumerate()
            .map(|(i, result)| {
                let labels = by_code
                    .get(result.stock_code.as_str())
                    .map(|s| LabelingEngine::limit_up_labels(s, &result.factors))
                    .unwrap_or_default();
                RankedCandidate {
                    rank: i + 1,
                    result,
                    labels,
                }
            })
            .collect()
    }

    /// 批量盘中分析，非法输入跳过并记录日志
    pub fn analyze_all(snapshots: &[StockSnapshot]) -> Vec<AnalysisResult> {
        snapshots
            .iter()
            .filter_map(|s| match DailyLimitUpAnalyzer::analyze(s) {
                Ok(r) => Some(r),
                Err(e) => {
                    log::warn!("跳过 {}({}): {}", s.name, s.code, e);
                    None
                }
            })
            .collect()
    }
}
