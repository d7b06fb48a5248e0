use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// 指数退避重试工具。
/// 仅对可重试错误（超时、5xx、连接错误）进行重试，4xx 等客户端错误直接返回。
///
/// # Arguments
/// * `label` - 日志中标识操作的名称
/// * `max_retries` - 最大重试次数（不含首次请求，总共最多执行 max_retries + 1 次）
/// * `operation` - 异步操作闭包
pub async fn retry_with_backoff<F, Fut, T, E>(
    label: &str,
    max_retries: u32,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !is_retryable(&e.to_string()) || attempt >= max_retries {
                    return Err(e);
                }
                // 指数退避: 1s, 2s, 4s
                let delay = Duration::from_secs(1 << attempt.min(5));
                log::warn!(
                    "{} 请求失败（第 {} 次），{}s 后重试: {}",
                    label,
                    attempt + 1,
                    delay.as_secs(),
                    e
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// 判断是否为可重试错误（超时/5xx/连接错误）
pub fn is_retryable(err_msg: &str) -> bool {
    let msg = err_msg.to_lowercase();
    msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("connection")
        || msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
        || msg.contains("server error")
        || msg.contains("broken pipe")
        || msg.contains("reset by peer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retries_retryable_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_backoff("test", 2, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 { Err("503 Service Unavailable".to_string()) } else { Ok(n) }
            }
        })
        .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("400 Bad Request".to_string()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
