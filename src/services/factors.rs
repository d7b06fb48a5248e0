//! 涨停潜力六因子打分，每个因子输出 0-100（未取整）

use crate::models::stock::{DayAggregate, StockSnapshot, TechnicalIndicators};

/// 截断到 [0, 100]；NaN 记 0
pub fn clamp_score(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 100.0)
}

/// 六因子原始得分（已截断，未取整）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFactors {
    pub volume: f64,
    pub money_flow: f64,
    pub rise_speed: f64,
    pub technical: f64,
    pub sentiment: f64,
    pub industry: f64,
}

// ===== 盘中因子 =====

/// 量比因子：量比每高出 1 倍加 20 分
pub fn intraday_volume(volume_ratio: f64) -> f64 {
    clamp_score((volume_ratio - 1.0) * 20.0)
}

/// 资金因子：净流入占比 × 3
pub fn intraday_money_flow(money_flow_percent: f64) -> f64 {
    clamp_score(money_flow_percent * 3.0)
}

/// 涨速因子：每分钟涨幅 × 30
pub fn intraday_rise_speed(rise_speed: f64) -> f64 {
    clamp_score(rise_speed * 30.0)
}

/// 技术因子：均线多头排列 70，站上 MA5 50，否则 30；RSI > 70 再加 20
pub fn intraday_technical(price: f64, t: &TechnicalIndicators) -> f64 {
    let base = if price > t.ma5 && t.ma5 > t.ma20 {
        70.0
    } else if price > t.ma5 {
        50.0
    } else {
        30.0
    };
    let score = if t.rsi > 70.0 { (base + 20.0_f64).min(100.0) } else { base };
    clamp_score(score)
}

pub fn sentiment(market_sentiment: f64) -> f64 {
    clamp_score(market_sentiment)
}

pub fn industry(industry_hotness: f64) -> f64 {
    clamp_score(industry_hotness)
}

pub fn intraday_factors(s: &StockSnapshot) -> RawFactors {
    RawFactors {
        volume: intraday_volume(s.volume_ratio),
        money_flow: intraday_money_flow(s.money_flow_percent),
        rise_speed: intraday_rise_speed(s.rise_speed),
        technical: intraday_technical(s.current_price, &s.technical_indicators),
        sentiment: sentiment(s.market_sentiment),
        industry: industry(s.industry_hotness),
    }
}

// ===== 次日因子 =====

/// 成交量因子：每百万股 10 分
pub fn next_day_volume(day_volume: f64) -> f64 {
    clamp_score(day_volume / 1_000_000.0 * 10.0)
}

/// 资金因子：每亿元净流入 50 分
pub fn next_day_money_flow(day_net_money_flow: f64) -> f64 {
    clamp_score(day_net_money_flow / 100_000_000.0 * 50.0)
}

/// 涨幅因子：当日涨跌幅 × 10
pub fn next_day_rise(price_change_percent: f64) -> f64 {
    clamp_score(price_change_percent * 10.0)
}

/// 技术因子：收盘位置 > 0.8 记 80，> 0.5 记 50，否则 30
pub fn next_day_technical(close_to_high: f64) -> f64 {
    if close_to_high > 0.8 {
        80.0
    } else if close_to_high > 0.5 {
        50.0
    } else {
        30.0
    }
}

pub fn next_day_factors(s: &StockSnapshot, day: &DayAggregate) -> RawFactors {
    RawFactors {
        volume: next_day_volume(day.day_volume),
        money_flow: next_day_money_flow(day.day_net_money_flow),
        rise_speed: next_day_rise(s.price_change_percent()),
        technical: next_day_technical(day.close_to_high(s.current_price)),
        sentiment: sentiment(s.market_sentiment),
        industry: industry(s.industry_hotness),
    }
}
