use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

pub struct TradingScheduler;

impl TradingScheduler {
    /// Pre-market bid 9:15-9:25, morning 9:30-11:30, afternoon 13:00-15:00
    pub fn is_trading_time_at(dt: NaiveDateTime) -> bool {
        if !Self::is_weekday(dt) {
            return false;
        }
        let time_val = Self::time_val(dt);
        (915..=925).contains(&time_val)
            || (930..=1130).contains(&time_val)
            || (1300..=1500).contains(&time_val)
    }

    /// Get market status description
    pub fn market_status_at(dt: NaiveDateTime) -> String {
        if !Self::is_weekday(dt) {
            return "休市(周末)".to_string();
        }
        let time_val = Self::time_val(dt);

        if time_val < 915 {
            "盘前".to_string()
        } else if time_val <= 925 {
            "竞价中".to_string()
        } else if time_val < 930 {
            "集合竞价结束".to_string()
        } else if time_val <= 1130 {
            "交易中(上午)".to_string()
        } else if time_val < 1300 {
            "午间休市".to_string()
        } else if time_val <= 1500 {
            "交易中(下午)".to_string()
        } else {
            "已收盘".to_string()
        }
    }

    fn time_val(dt: NaiveDateTime) -> u32 {
        dt.hour() * 100 + dt.minute()
    }

    fn is_weekday(dt: NaiveDateTime) -> bool {
        let weekday = dt.weekday();
        weekday != Weekday::Sat && weekday != Weekday::Sun
    }
}
