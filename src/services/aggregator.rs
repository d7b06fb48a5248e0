use crate::models::analysis::{FactorScores, RecommendationTier, RiskLevel};
use crate::services::factors::{clamp_score, RawFactors};

/// 六因子权重（百分比整数，总和 = 100）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactorWeights {
    pub volume: u32,
    pub money_flow: u32,
    pub rise_speed: u32,
    pub technical: u32,
    pub sentiment: u32,
    pub industry: u32,
}

impl FactorWeights {
    pub const fn total(&self) -> u32 {
        self.volume + self.money_flow + self.rise_speed + self.technical + self.sentiment + self.industry
    }
}

/// 概率加成：涨跌幅严格大于 threshold 时加 bonus（封顶 100）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityBoost {
    pub change_above: f64,
    pub bonus: f64,
}

/// 风险分级阈值（均为严格比较）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub high_above: f64,
    pub low_below: f64,
}

/// 推荐档位阈值（均为严格大于）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub strongly_bullish: f64,
    pub bullish: f64,
    pub neutral: f64,
}

/// 一种分析器的完整聚合参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregationProfile {
    pub weights: FactorWeights,
    /// 按顺序逐条独立判断，可叠加
    pub boosts: &'static [ProbabilityBoost],
    pub risk: RiskThresholds,
    pub tiers: TierThresholds,
}

pub const INTRADAY_PROFILE: AggregationProfile = AggregationProfile {
    weights: FactorWeights {
        volume: 20,
        money_flow: 25,
        rise_speed: 20,
        technical: 15,
        sentiment: 15,
        industry: 5,
    },
    // 涨幅 > 8% 时两档加成都会生效
    boosts: &[
        ProbabilityBoost { change_above: 8.0, bonus: 20.0 },
        ProbabilityBoost { change_above: 5.0, bonus: 10.0 },
    ],
    risk: RiskThresholds { high_above: 80.0, low_below: 40.0 },
    tiers: TierThresholds { strongly_bullish: 80.0, bullish: 60.0, neutral: 40.0 },
};

pub const NEXT_DAY_PROFILE: AggregationProfile = AggregationProfile {
    weights: FactorWeights {
        volume: 15,
        money_flow: 25,
        rise_speed: 10,
        technical: 20,
        sentiment: 15,
        industry: 15,
    },
    boosts: &[ProbabilityBoost { change_above: 7.0, bonus: 15.0 }],
    risk: RiskThresholds { high_above: 75.0, low_below: 35.0 },
    tiers: TierThresholds { strongly_bullish: 75.0, bullish: 55.0, neutral: 35.0 },
};

/// 聚合输出（概率未取整，供档位判断使用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub score: f64,
    pub probability: f64,
    pub factors: FactorScores,
    pub tier: RecommendationTier,
    pub risk: RiskLevel,
}

pub struct WeightedAggregator;

impl WeightedAggregator {
    /// 加权综合得分 0-100
    pub fn weighted_score(f: &RawFactors, w: &FactorWeights) -> f64 {
        let total = f.volume * w.volume as f64
            + f.money_flow * w.money_flow as f64
            + f.rise_speed * w.rise_speed as f64
            + f.technical * w.technical as f64
            + f.sentiment * w.sentiment as f64
            + f.industry * w.industry as f64;
        let weight_sum = w.total() as f64;
        if weight_sum > 0.0 {
            clamp_score(total / weight_sum)
        } else {
            0.0
        }
    }

    pub fn apply_boosts(score: f64, change_pct: f64, boosts: &[ProbabilityBoost]) -> f64 {
        let mut probability = clamp_score(score);
        for boost in boosts {
            if change_pct > boost.change_above {
                probability = (probability + boost.bonus).min(100.0);
            }
        }
        probability
    }

    pub fn classify_risk(probability: f64, t: &RiskThresholds) -> RiskLevel {
        if probability > t.high_above {
            RiskLevel::High
        } else if probability < t.low_below {
            RiskLevel::Low
        } else {
            RiskLevel::Medium
        }
    }

    pub fn classify_tier(probability: f64, t: &TierThresholds) -> RecommendationTier {
        if probability > t.strongly_bullish {
            RecommendationTier::StronglyBullish
        } else if probability > t.bullish {
            RecommendationTier::Bullish
        } else if probability > t.neutral {
            RecommendationTier::Neutral
        } else {
            RecommendationTier::Bearish
        }
    }

    pub fn aggregate(raw: &RawFactors, change_pct: f64, profile: &AggregationProfile) -> Aggregate {
        let score = Self::weighted_score(raw, &profile.weights);
        let probability = Self::apply_boosts(score, change_pct, profile.boosts);
        Aggregate {
            score,
            probability,
            factors: round_factors(raw),
            tier: Self::classify_tier(probability, &profile.tiers),
            risk: Self::classify_risk(probability, &profile.risk),
        }
    }
}

/// 0-100 取整（四舍五入，远离零）
pub fn round_score(v: f64) -> u32 {
    clamp_score(v).round() as u32
}

fn round_factors(raw: &RawFactors) -> FactorScores {
    FactorScores {
        volume: round_score(raw.volume),
        money_flow: round_score(raw.money_flow),
        rise_speed: round_score(raw.rise_speed),
        technical: round_score(raw.technical),
        sentiment: round_score(raw.sentiment),
        industry: round_score(raw.industry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_vectors_sum_to_one() {
        assert_eq!(INTRADAY_PROFILE.weights.total(), 100);
        assert_eq!(NEXT_DAY_PROFILE.weights.total(), 100);
    }

    #[test]
    fn test_intraday_boosts_stack_above_eight() {
        let boosts = INTRADAY_PROFILE.boosts;
        assert_eq!(WeightedAggregator::apply_boosts(50.0, 9.0, boosts), 80.0);
        assert_eq!(WeightedAggregator::apply_boosts(50.0, 8.0, boosts), 60.0);
        assert_eq!(WeightedAggregator::apply_boosts(50.0, 5.0, boosts), 50.0);
        assert_eq!(WeightedAggregator::apply_boosts(85.0, 9.0, boosts), 100.0);
    }

    #[test]
    fn test_next_day_single_boost() {
        let boosts = NEXT_DAY_PROFILE.boosts;
        assert_eq!(WeightedAggregator::apply_boosts(50.0, 9.5, boosts), 65.0);
        assert_eq!(WeightedAggregator::apply_boosts(50.0, 7.0, boosts), 50.0);
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        let t = &INTRADAY_PROFILE.tiers;
        assert_eq!(WeightedAggregator::classify_tier(80.0, t), RecommendationTier::Bullish);
        assert_eq!(WeightedAggregator::classify_tier(80.01, t), RecommendationTier::StronglyBullish);
        assert_eq!(WeightedAggregator::classify_tier(60.0, t), RecommendationTier::Neutral);
        assert_eq!(WeightedAggregator::classify_tier(40.0, t), RecommendationTier::Bearish);

        let n = &NEXT_DAY_PROFILE.tiers;
        assert_eq!(WeightedAggregator::classify_tier(75.0, n), RecommendationTier::Bullish);
        assert_eq!(WeightedAggregator::classify_tier(75.01, n), RecommendationTier::StronglyBullish);
        assert_eq!(WeightedAggregator::classify_tier(55.5, n), RecommendationTier::Bullish);
        assert_eq!(WeightedAggregator::classify_tier(35.0, n), RecommendationTier::Bearish);
    }

    #[test]
    fn test_risk_thresholds() {
        let r = &INTRADAY_PROFILE.risk;
        assert_eq!(WeightedAggregator::classify_risk(80.0, r), RiskLevel::Medium);
        assert_eq!(WeightedAggregator::classify_risk(80.5, r), RiskLevel::High);
        assert_eq!(WeightedAggregator::classify_risk(40.0, r), RiskLevel::Medium);
        assert_eq!(WeightedAggregator::classify_risk(39.9, r), RiskLevel::Low);

        let n = &NEXT_DAY_PROFILE.risk;
        assert_eq!(WeightedAggregator::classify_risk(76.0, n), RiskLevel::High);
        assert_eq!(WeightedAggregator::classify_risk(34.0, n), RiskLevel::Low);
        assert_eq!(WeightedAggregator::classify_risk(35.0, n), RiskLevel::Medium);
    }

    #[test]
    fn test_weighted_score_exact() {
        let raw = RawFactors {
            volume: 60.0,
            money_flow: 60.0,
            rise_speed: 60.0,
            technical: 90.0,
            sentiment: 80.0,
            industry: 60.0,
        };
        assert_eq!(WeightedAggregator::weighted_score(&raw, &INTRADAY_PROFILE.weights), 67.5);
        assert_eq!(round_score(67.5), 68);
    }
}
