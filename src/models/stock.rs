use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// 技术指标快照（由行情源或 K 线推导得到）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub ma5: f64,
    pub ma20: f64,
    pub rsi: f64,  // 0-100
    pub macd: f64, // MACD 柱
}

/// 个股实时快照（评分引擎的输入契约）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub code: String, // "sz000001"
    pub name: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub volume: f64,             // 成交量（股）
    pub volume_ratio: f64,       // 量比
    pub net_money_flow: f64,     // 主力净流入（元）
    pub money_flow_percent: f64, // 净流入占成交额 %
    pub rise_speed: f64,         // 涨速 %/分钟
    pub technical_indicators: TechnicalIndicators,
    #[serde(default)]
    pub industry_code: String,
    #[serde(default)]
    pub industry_hotness: f64, // 0-100
    #[serde(default)]
    pub market_sentiment: f64, // 0-100
}

impl StockSnapshot {
    /// 当日涨跌幅 %，调用前需先通过 `validate`
    pub fn price_change_percent(&self) -> f64 {
        if self.previous_close == 0.0 {
            return 0.0;
        }
        (self.current_price - self.previous_close) / self.previous_close * 100.0
    }

    /// 校验数值字段：全部有限，价格为正
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let t = &self.technical_indicators;
        let fields = [
            ("currentPrice", self.current_price),
            ("previousClose", self.previous_close),
            ("volume", self.volume),
            ("volumeRatio", self.volume_ratio),
            ("netMoneyFlow", self.net_money_flow),
            ("moneyFlowPercent", self.money_flow_percent),
            ("riseSpeed", self.rise_speed),
            ("technicalIndicators.ma5", t.ma5),
            ("technicalIndicators.ma20", t.ma20),
            ("technicalIndicators.rsi", t.rsi),
            ("technicalIndicators.macd", t.macd),
            ("industryHotness", self.industry_hotness),
            ("marketSentiment", self.market_sentiment),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::invalid(field, "not a finite number"));
            }
        }
        if self.previous_close <= 0.0 {
            return Err(AnalysisError::invalid("previousClose", "must be greater than 0"));
        }
        if self.current_price <= 0.0 {
            return Err(AnalysisError::invalid("currentPrice", "must be greater than 0"));
        }
        Ok(())
    }
}

/// 单个交易日的汇总数据（次日分析使用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAggregate {
    pub day_volume: f64,
    pub day_net_money_flow: f64,
    pub day_high_price: f64,
    pub day_low_price: f64,
}

impl DayAggregate {
    /// 由当日分时/日内 K 线汇总；空序列返回 None
    pub fn from_klines(bars: &[KLineData], day_net_money_flow: f64) -> Option<Self> {
        if bars.is_empty() {
            return None;
        }
        let day_volume = bars.iter().map(|b| b.volume).sum();
        let day_high_price = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let day_low_price = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        Some(Self {
            day_volume,
            day_net_money_flow,
            day_high_price,
            day_low_price,
        })
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fields = [
            ("dayVolume", self.day_volume),
            ("dayNetMoneyFlow", self.day_net_money_flow),
            ("dayHighPrice", self.day_high_price),
            ("dayLowPrice", self.day_low_price),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::invalid(field, "not a finite number"));
            }
        }
        if self.day_high_price < self.day_low_price {
            return Err(AnalysisError::invalid("dayHighPrice", "must not be below dayLowPrice"));
        }
        Ok(())
    }

    /// 收盘位置：(现价 - 最低) / (最高 - 最低)
    /// 一字板（最高 == 最低）时，现价不低于最高价记 1.0，否则 0.0
    pub fn close_to_high(&self, current_price: f64) -> f64 {
        let range = self.day_high_price - self.day_low_price;
        if range <= 0.0 {
            return if current_price >= self.day_high_price { 1.0 } else { 0.0 };
        }
        (current_price - self.day_low_price) / range
    }
}

/// 行情帧：快照 + 可选的当日汇总（盘后才有）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFrame {
    pub snapshot: StockSnapshot,
    #[serde(default)]
    pub day: Option<DayAggregate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KLineData {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64, volume: f64) -> KLineData {
        KLineData {
            date: "2024-05-06 10:00".to_string(),
            open: low,
            high,
            low,
            close: high,
            volume,
            amount: volume * high,
        }
    }

    #[test]
    fn test_day_aggregate_from_klines() {
        let bars = vec![bar(10.5, 10.0, 1000.0), bar(11.0, 10.4, 2500.0), bar(10.8, 9.8, 500.0)];
        let day = DayAggregate::from_klines(&bars, 3.0e7).unwrap();
        assert_eq!(day.day_volume, 4000.0);
        assert_eq!(day.day_high_price, 11.0);
        assert_eq!(day.day_low_price, 9.8);
        assert_eq!(day.day_net_money_flow, 3.0e7);
        assert!(DayAggregate::from_klines(&[], 0.0).is_none());
    }

    #[test]
    fn test_close_to_high_flat_board() {
        let day = DayAggregate {
            day_volume: 1.0,
            day_net_money_flow: 0.0,
            day_high_price: 11.0,
            day_low_price: 11.0,
        };
        assert_eq!(day.close_to_high(11.0), 1.0);
        assert_eq!(day.close_to_high(10.9), 0.0);
        assert!(day.close_to_high(11.0).is_finite());
    }

    #[test]
    fn test_day_aggregate_rejects_inverted_range() {
        let day = DayAggregate {
            day_volume: 1.0,
            day_net_money_flow: 0.0,
            day_high_price: 9.0,
            day_low_price: 10.0,
        };
        assert!(day.validate().is_err());
    }
}
