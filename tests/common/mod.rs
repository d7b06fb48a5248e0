//! 测试专用的合成数据生成器（随机行情、讨论帖），不参与任何生产评分逻辑
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radar_lib::models::discussion::DiscussionThread;
use radar_lib::models::stock::{DayAggregate, MarketFrame, StockSnapshot, TechnicalIndicators};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// 随机但合法的快照（昨收 > 0，涨跌幅 -10% ~ +10%）
pub fn synthetic_snapshot(rng: &mut StdRng, code: &str) -> StockSnapshot {
    let previous_close = rng.gen_range(2.0..200.0);
    let change = rng.gen_range(-0.1..0.1);
    let current_price = previous_close * (1.0 + change);
    let ma5 = previous_close * rng.gen_range(0.9..1.1);
    let ma20 = previous_close * rng.gen_range(0.85..1.15);
    let volume = rng.gen_range(1.0e5..5.0e7);
    StockSnapshot {
        code: code.to_string(),
        name: format!("模拟{}", code),
        current_price,
        previous_close,
        volume,
        volume_ratio: rng.gen_range(0.2..8.0),
        net_money_flow: rng.gen_range(-2.0e8..2.0e8),
        money_flow_percent: rng.gen_range(-40.0..40.0),
        rise_speed: rng.gen_range(-2.0..5.0),
        technical_indicators: TechnicalIndicators {
            ma5,
            ma20,
            rsi: rng.gen_range(0.0..100.0),
            macd: rng.gen_range(-1.0..1.0),
        },
        industry_code: format!("BK{:04}", rng.gen_range(400..1200)),
        industry_hotness: rng.gen_range(0.0..100.0),
        market_sentiment: rng.gen_range(0.0..100.0),
    }
}

/// 模拟收盘后的全天汇总，最高价不低于现价、最低价不高于现价
pub fn synthetic_day(rng: &mut StdRng, s: &StockSnapshot) -> DayAggregate {
    DayAggregate {
        day_volume: s.volume,
        day_net_money_flow: s.net_money_flow,
        day_high_price: s.current_price * rng.gen_range(1.0..1.05),
        day_low_price: s.current_price * rng.gen_range(0.95..1.0),
    }
}

pub fn synthetic_frames(seed: u64, n: usize) -> Vec<MarketFrame> {
    let mut rng = rng(seed);
    (0..n)
        .map(|i| {
            let code = format!("sz{:06}", i + 1);
            let snapshot = synthetic_snapshot(&mut rng, &code);
            let day = Some(synthetic_day(&mut rng, &snapshot));
            MarketFrame { snapshot, day }
        })
        .collect()
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 2, 0, 0).unwrap()
}

pub fn thread(id: &str, title: &str, tags: &[&str], content: &str) -> DiscussionThread {
    DiscussionThread {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        author: "tester".to_string(),
        category: "综合".to_string(),
        stock_code: None,
        stock_name: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        views: 0,
        replies: 0,
        likes: 0,
        created_at: base_time(),
    }
}

/// 随机讨论帖，标签取自固定词表
pub fn synthetic_threads(seed: u64, n: usize) -> Vec<DiscussionThread> {
    const TAGS: [&str; 6] = ["涨停", "AI", "半导体", "白酒", "新能源", "短线"];
    let mut rng = rng(seed);
    (0..n)
        .map(|i| {
            let mut t = thread(&format!("t{}", i), &format!("帖子 {}", i), &[], "内容");
            let tag_count = rng.gen_range(0..3);
            t.tags = (0..tag_count).map(|_| TAGS[rng.gen_range(0..TAGS.len())].to_string()).collect();
            t.views = rng.gen_range(0..5000);
            t.replies = rng.gen_range(0..200);
            t.created_at = base_time() - Duration::minutes(rng.gen_range(0..10_000));
            t
        })
        .collect()
}
