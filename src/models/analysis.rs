use serde::{Deserialize, Serialize};

/// 分析周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    /// 盘中（实时涨停潜力）
    Intraday,
    /// 次日（盘后汇总预测）
    NextDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// 四档推荐结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Bearish,
    Neutral,
    Bullish,
    StronglyBullish,
}

impl RecommendationTier {
    /// 固定话术
    pub fn narrative(self, horizon: Horizon) -> &'static str {
        match (horizon, self) {
            (Horizon::Intraday, Self::StronglyBullish) => "强烈看涨：涨停概率很高，重点关注",
            (Horizon::Intraday, Self::Bullish) => "看涨：具备冲击涨停的条件",
            (Horizon::Intraday, Self::Neutral) => "中性：有一定机会，谨慎观察",
            (Horizon::Intraday, Self::Bearish) => "看淡：涨停概率较低",
            (Horizon::NextDay, Self::StronglyBullish) => "次日强烈看涨：次日涨停概率很高",
            (Horizon::NextDay, Self::Bullish) => "次日看涨：次日有望继续走强",
            (Horizon::NextDay, Self::Neutral) => "次日中性：次日走势不明朗",
            (Horizon::NextDay, Self::Bearish) => "次日看淡：次日涨停概率较低",
        }
    }
}

/// 六个因子分项（0-100 整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScores {
    pub volume: u32,
    pub money_flow: u32,
    pub rise_speed: u32,
    pub technical: u32,
    pub sentiment: u32,
    pub industry: u32,
}

/// 单只股票的涨停潜力分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub stock_code: String,
    pub stock_name: String,
    pub horizon: Horizon,
    pub score: u32,       // 综合得分 0-100
    pub probability: u32, // 涨停概率 0-100
    pub factors: FactorScores,
    pub recommendation: String,
    pub tier: RecommendationTier,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLabel {
    pub text: String,
    pub color: String,
    pub icon: Option<String>,
}

/// 排名后的候选股（附带标签）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub rank: usize,
    pub result: AnalysisResult,
    #[serde(default)]
    pub labels: Vec<StockLabel>,
}
