use crate::models::discussion::{DiscussionThread, RecommendationItem};

pub const DEFAULT_LIMIT: usize = 5;
pub const SIMILAR_LIMIT: usize = 3;

/// 最新推荐的占位分，顺序才代表新旧
const LATEST_SCORE: u64 = 100;

pub struct RecommendationEngine;

impl RecommendationEngine {
    /// 热门：浏览量 + 回复数 × 2
    pub fn hot(threads: &[DiscussionThread]) -> Vec<RecommendationItem> {
        let items = threads
            .iter()
            .map(|t| {
                let score = t.views.saturating_add(t.replies.saturating_mul(2));
                let reasons = vec![format!("浏览 {}", t.views), format!("回复 {}", t.replies)];
                RecommendationItem::new(t.clone(), score, reasons)
            })
            .collect();
        top_by_score(items, DEFAULT_LIMIT)
    }

    /// 最新：按发帖时间倒序
    pub fn latest(threads: &[DiscussionThread]) -> Vec<RecommendationItem> {
        let mut sorted: Vec<&DiscussionThread> = threads.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
            .into_iter()
            .take(DEFAULT_LIMIT)
            .map(|t| {
                let reasons = vec![format!("发布于 {}", t.created_at.format("%Y-%m-%d %H:%M"))];
                RecommendationItem::new(t.clone(), LATEST_SCORE, reasons)
            })
            .collect()
    }

    /// 兴趣推荐：标签命中每个 +30，股票名命中 +40，浏览 > 1000 +20，回复 > 30 +15
    pub fn for_interests(threads: &[DiscussionThread], interests: &[String]) -> Vec<RecommendationItem> {
        // 小写去重，保持原顺序
        let mut lowered: Vec<String> = Vec::new();
        for interest in interests {
            let i = interest.trim().to_lowercase();
            if !i.is_empty() && !lowered.contains(&i) {
                lowered.push(i);
            }
        }
        let interests = lowered;

        let items = threads
            .iter()
            .filter_map(|t| {
                let mut score = 0;
                let mut reasons = Vec::new();

                for interest in &interests {
                    if let Some(tag) = t.tags.iter().find(|tag| tag.to_lowercase() == *interest) {
                        score += 30;
                        reasons.push(format!("关注标签「{}」", tag));
                    }
                }

                if let Some(name) = t.stock_name.as_deref() {
                    if interests.contains(&name.to_lowercase()) {
                        score += 40;
                        reasons.push(format!("关注个股「{}」", name));
                    }
                }

                if t.views > 1000 {
                    score += 20;
                    reasons.push("高浏览".to_string());
                }

                if t.replies > 30 {
                    score += 15;
                    reasons.push("讨论热烈".to_string());
                }

                if score == 0 {
                    return None;
                }
                Some(RecommendationItem::new(t.clone(), score, reasons))
            })
            .collect();

        top_by_score(items, DEFAULT_LIMIT)
    }

    /// 相似帖子：同股票 +50，同分类 +30，每个共同标签 +20
    pub fn similar(source: &DiscussionThread, threads: &[DiscussionThread]) -> Vec<RecommendationItem> {
        let items = threads
            .iter()
            .filter(|t| t.id != source.id)
            .filter_map(|t| {
                let mut score = 0;
                let mut reasons = Vec::new();

                if source.stock_code.is_some() && t.stock_code == source.stock_code {
                    score += 50;
                    reasons.push("同一股票".to_string());
                }

                if !source.category.is_empty() && t.category == source.category {
                    score += 30;
                    reasons.push("同一分类".to_string());
                }

                let shared = shared_tag_count(&source.tags, &t.tags);
                if shared > 0 {
                    score += 20 * shared as u64;
                    reasons.push(format!("{} 个共同标签", shared));
                }

                if score == 0 {
                    return None;
                }
                Some(RecommendationItem::new(t.clone(), score, reasons))
            })
            .collect();

        top_by_score(items, SIMILAR_LIMIT)
    }
}

fn shared_tag_count(a: &[String], b: &[String]) -> usize {
    let b_lower: Vec<String> = b.iter().map(|t| t.to_lowercase()).collect();
    let mut seen: Vec<String> = Vec::new();
    for tag in a {
        let lower = tag.to_lowercase();
        if b_lower.contains(&lower) && !seen.contains(&lower) {
            seen.push(lower);
        }
    }
    seen.len()
}

/// 稳定排序：同分保持输入顺序
fn top_by_score(mut items: Vec<RecommendationItem>, limit: usize) -> Vec<RecommendationItem> {
    items.sort_by(|a, b| b.score.cmp(&a.score));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn thread(id: &str, views: u64, replies: u64) -> DiscussionThread {
        DiscussionThread {
            id: id.to_string(),
            title: format!("帖子{}", id),
            content: String::new(),
            author: String::new(),
            category: String::new(),
            stock_code: None,
            stock_name: None,
            tags: vec![],
            views,
            replies,
            likes: 0,
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_hot_score() {
        let items = RecommendationEngine::hot(&[thread("a", 1500, 40), thread("b", 100, 0)]);
        assert_eq!(items[0].thread.id, "a");
        assert_eq!(items[0].score, 1580);
        assert_eq!(items[1].score, 100);
    }

    #[test]
    fn test_hot_top_five() {
        let threads: Vec<DiscussionThread> = (0..8).map(|i| thread(&i.to_string(), i * 10, 0)).collect();
        let items = RecommendationEngine::hot(&threads);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].thread.id, "7");
        assert_eq!(items[4].thread.id, "3");
    }

    #[test]
    fn test_latest_orders_by_time() {
        let base = Utc.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap();
        let threads: Vec<DiscussionThread> = (0..7)
            .map(|i| {
                let mut t = thread(&i.to_string(), 0, 0);
                t.created_at = base + Duration::minutes(i);
                t
            })
            .collect();
        let items = RecommendationEngine::latest(&threads);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].thread.id, "6");
        assert!(items.iter().all(|i| i.score == 100));
    }

    #[test]
    fn test_interest_reasons() {
        let mut t = thread("a", 1200, 35);
        t.tags = vec!["AI".to_string(), "算力".to_string()];
        t.stock_name = Some("中际旭创".to_string());
        let interests = vec!["ai".to_string(), "算力".to_string(), "中际旭创".to_string()];
        let items = RecommendationEngine::for_interests(&[t, thread("b", 10, 1)], &interests);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].score, 30 + 30 + 40 + 20 + 15);
        assert_eq!(items[0].reasons.len(), 5);
        assert_eq!(
            items[0].reason,
            "关注标签「AI」 · 关注标签「算力」 · 关注个股「中际旭创」 · 高浏览 · 讨论热烈"
        );
    }

    #[test]
    fn test_hot_score_saturates() {
        let items = RecommendationEngine::hot(&[thread("a", u64::MAX - 1, u64::MAX / 2 + 1)]);
        assert_eq!(items[0].score, u64::MAX);
    }

    #[test]
    fn test_duplicate_interests_count_once() {
        let mut t = thread("a", 0, 0);
        t.tags = vec!["AI".to_string()];
        let interests = vec!["AI".to_string(), "ai".to_string(), " Ai ".to_string()];
        let items = RecommendationEngine::for_interests(&[t], &interests);
        assert_eq!(items[0].score, 30);
        assert_eq!(items[0].reasons, vec!["关注标签「AI」".to_string()]);
    }

    #[test]
    fn test_similar() {
        let mut source = thread("s", 0, 0);
        source.stock_code = Some("sz300750".to_string());
        source.category = "个股".to_string();
        source.tags = vec!["锂电".to_string(), "新能源".to_string()];

        let mut same_stock = thread("1", 0, 0);
        same_stock.stock_code = Some("sz300750".to_string());
        same_stock.tags = vec!["锂电".to_string()];

        let mut same_cat = thread("2", 0, 0);
        same_cat.category = "个股".to_string();

        let unrelated = thread("3", 0, 0);

        let items = RecommendationEngine::similar(
            &source,
            &[source.clone(), unrelated, same_cat, same_stock],
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].thread.id, "1");
        assert_eq!(items[0].score, 70);
        assert_eq!(items[1].score, 30);
    }
}
