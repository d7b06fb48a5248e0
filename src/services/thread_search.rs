use regex::{Regex, RegexBuilder};

use crate::models::discussion::{DiscussionThread, MatchedField, SearchFilters, SearchResult, SortBy};

const TITLE_SCORE: u32 = 100;
const TAG_SCORE: u32 = 75;
const CONTENT_SCORE: u32 = 50;

pub struct ThreadSearchEngine;

impl ThreadSearchEngine {
    /// 讨论区全文搜索：标题 +100、标签 +75、正文 +50，可累加
    /// 空查询不做相关性过滤（相关度记 0）
    pub fn search(threads: &[DiscussionThread], query: &str, filters: &SearchFilters) -> Vec<SearchResult> {
        let needle = query.trim().to_lowercase();

        let mut results: Vec<SearchResult> = threads
            .iter()
            .filter(|t| Self::passes_filter(t, filters))
            .filter_map(|t| {
                if needle.is_empty() {
                    return Some(SearchResult {
                        thread: t.clone(),
                        relevance: 0,
                        matched_fields: vec![],
                    });
                }
                let (relevance, matched_fields) = Self::relevance(t, &needle);
                if relevance == 0 {
                    return None;
                }
                Some(SearchResult {
                    thread: t.clone(),
                    relevance,
                    matched_fields,
                })
            })
            .collect();

        match filters.sort_by {
            SortBy::Relevance => results.sort_by(|a, b| b.relevance.cmp(&a.relevance)),
            SortBy::Views => results.sort_by(|a, b| b.thread.views.cmp(&a.thread.views)),
            SortBy::Replies => results.sort_by(|a, b| b.thread.replies.cmp(&a.thread.replies)),
            SortBy::Recency => results.sort_by(|a, b| b.thread.created_at.cmp(&a.thread.created_at)),
        }

        results
    }

    /// needle 需已转小写
    fn relevance(t: &DiscussionThread, needle: &str) -> (u32, Vec<MatchedField>) {
        let mut score = 0;
        let mut fields = Vec::new();

        if t.title.to_lowercase().contains(needle) {
            score += TITLE_SCORE;
            fields.push(MatchedField::Title);
        }
        if t.tags.iter().any(|tag| tag.to_lowercase().contains(needle)) {
            score += TAG_SCORE;
            fields.push(MatchedField::Tags);
        }
        if t.content.to_lowercase().contains(needle) {
            score += CONTENT_SCORE;
            fields.push(MatchedField::Content);
        }

        (score, fields)
    }

    fn passes_filter(t: &DiscussionThread, f: &SearchFilters) -> bool {
        if let Some(category) = &f.category {
            if &t.category != category {
                return false;
            }
        }
        if let Some(code) = &f.stock_code {
            if t.stock_code.as_deref() != Some(code.as_str()) {
                return false;
            }
        }
        if f.min_views.is_some_and(|v| t.views < v) {
            return false;
        }
        if f.min_replies.is_some_and(|r| t.replies < r) {
            return false;
        }
        if f.from.is_some_and(|from| t.created_at < from) {
            return false;
        }
        if f.to.is_some_and(|to| t.created_at > to) {
            return false;
        }
        true
    }
}

/// 将文本中所有（不区分大小写的）命中片段包裹为 <mark>…</mark>
pub fn highlight(text: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return text.to_string();
    }
    match build_pattern(query) {
        Some(re) => re.replace_all(text, "<mark>$0</mark>").into_owned(),
        None => text.to_string(),
    }
}

fn build_pattern(query: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn thread(id: &str, title: &str, content: &str, tags: &[&str]) -> DiscussionThread {
        DiscussionThread {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author: "股友".to_string(),
            category: "个股".to_string(),
            stock_code: None,
            stock_name: None,
            tags: tags.iter().map(|s| s.to_string()).collect(),
            views: 0,
            replies: 0,
            likes: 0,
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_tag_only_match_scores_75() {
        let threads = vec![thread("1", "今日复盘", "大盘震荡", &["Robotics"])];
        let r = ThreadSearchEngine::search(&threads, "robot", &SearchFilters::default());
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].relevance, 75);
        assert_eq!(r[0].matched_fields, vec![MatchedField::Tags]);
    }

    #[test]
    fn test_title_and_tag_match_scores_175() {
        let threads = vec![thread("1", "机器人板块涨停潮", "无关内容", &["机器人"])];
        let r = ThreadSearchEngine::search(&threads, "机器人", &SearchFilters::default());
        assert_eq!(r[0].relevance, 175);
    }

    #[test]
    fn test_all_fields_accumulate_and_zero_excluded() {
        let threads = vec![
            thread("1", "AI 算力", "ai 服务器订单", &["AI"]),
            thread("2", "银行股分红", "高股息", &[]),
        ];
        let r = ThreadSearchEngine::search(&threads, "  Ai ", &SearchFilters::default());
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].relevance, 225);
    }

    #[test]
    fn test_sort_by_views_and_filters() {
        let mut a = thread("a", "涨停复盘", "", &[]);
        a.views = 10;
        a.replies = 50;
        let mut b = thread("b", "涨停预测", "", &[]);
        b.views = 500;
        b.replies = 1;
        let mut c = thread("c", "涨停板", "", &[]);
        c.views = 100;
        c.category = "板块".to_string();

        let filters = SearchFilters {
            category: Some("个股".to_string()),
            sort_by: SortBy::Views,
            ..Default::default()
        };
        let r = ThreadSearchEngine::search(&[a.clone(), b.clone(), c.clone()], "涨停", &filters);
        let ids: Vec<&str> = r.iter().map(|x| x.thread.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let filters = SearchFilters {
            min_replies: Some(10),
            ..Default::default()
        };
        let r = ThreadSearchEngine::search(&[a, b, c], "涨停", &filters);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].thread.id, "a");
    }

    #[test]
    fn test_date_range_and_stock_filter() {
        let mut old = thread("old", "茅台", "", &[]);
        old.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        old.stock_code = Some("sh600519".to_string());
        let mut new = thread("new", "茅台", "", &[]);
        new.stock_code = Some("sh600519".to_string());
        let other = thread("other", "茅台", "", &[]);

        let filters = SearchFilters {
            stock_code: Some("sh600519".to_string()),
            from: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let r = ThreadSearchEngine::search(&[old, new, other], "茅台", &filters);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].thread.id, "new");
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let at = |h: u32| Utc.with_ymd_and_hms(2024, 5, 6, h, 0, 0).unwrap();
        let threads: Vec<DiscussionThread> = [9, 10, 11, 12]
            .iter()
            .map(|&h| {
                let mut t = thread(&h.to_string(), "复盘", "", &[]);
                t.created_at = at(h);
                t
            })
            .collect();
        let filters = SearchFilters {
            from: Some(at(10)),
            to: Some(at(11)),
            sort_by: SortBy::Recency,
            ..Default::default()
        };
        let r = ThreadSearchEngine::search(&threads, "复盘", &filters);
        let ids: Vec<&str> = r.iter().map(|x| x.thread.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "10"]);
    }

    #[test]
    fn test_sort_by_replies_is_stable() {
        let mut a = thread("a", "龙头", "", &[]);
        a.replies = 5;
        let mut b = thread("b", "龙头", "", &[]);
        b.replies = 80;
        let mut c = thread("c", "龙头", "", &[]);
        c.replies = 5;
        let filters = SearchFilters { sort_by: SortBy::Replies, ..Default::default() };
        let r = ThreadSearchEngine::search(&[a, b, c], "龙头", &filters);
        let ids: Vec<&str> = r.iter().map(|x| x.thread.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_query_returns_filtered_threads() {
        let threads = vec![thread("1", "a", "", &[]), thread("2", "b", "", &[])];
        let r = ThreadSearchEngine::search(&threads, "   ", &SearchFilters::default());
        assert_eq!(r.len(), 2);
        assert!(r.iter().all(|x| x.relevance == 0));
    }

    #[test]
    fn test_highlight() {
        assert_eq!(highlight("AI and ai", "Ai"), "<mark>AI</mark> and <mark>ai</mark>");
        assert_eq!(highlight("价格(元)", "(元)"), "价格<mark>(元)</mark>");
        assert_eq!(highlight("abc", ""), "abc");
    }
}
