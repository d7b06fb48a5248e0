pub mod aggregator;
pub mod channels;
pub mod factors;
pub mod labeling;
pub mod limit_up;
pub mod notification;
pub mod price_alert;
pub mod recommendation;
pub mod scheduler;
pub mod technical_indicators;
pub mod thread_search;
pub mod watcher;
