use crate::models::stock::{KLineData, TechnicalIndicators};

/// 由日线收盘价序列推导快照所需的最新技术指标
/// 数据不足时：均线取最新收盘价，RSI 取 50，MACD 取 0
pub fn compute_snapshot_indicators(closes: &[f64]) -> TechnicalIndicators {
    let last_close = closes.last().copied().unwrap_or(0.0);

    let ma5 = last_value(&calc_ma(closes, 5)).unwrap_or(last_close);
    let ma20 = last_value(&calc_ma(closes, 20)).unwrap_or(last_close);
    let rsi = last_value(&calc_rsi(closes, 6)).unwrap_or(50.0);
    let (_, _, hist) = calc_macd(closes, 12, 26, 9);
    // EMA 需要一定长度才有意义
    let macd = if closes.len() >= 26 {
        last_value(&hist).unwrap_or(0.0)
    } else {
        0.0
    };

    TechnicalIndicators { ma5, ma20, rsi, macd }
}

pub fn indicators_from_klines(klines: &[KLineData]) -> TechnicalIndicators {
    let closes: Vec<f64> = klines.iter().map(|k| k.close).collect();
    compute_snapshot_indicators(&closes)
}

/// 涨速：最近 window 根分钟线的平均每分钟涨幅 %
pub fn rise_speed(minute_closes: &[f64], window: usize) -> f64 {
    let n = minute_closes.len();
    if n < 2 || window == 0 {
        return 0.0;
    }
    let span = window.min(n - 1);
    let start = minute_closes[n - 1 - span];
    if start <= 0.0 {
        return 0.0;
    }
    (minute_closes[n - 1] - start) / start * 100.0 / span as f64
}

fn last_value(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

fn calc_ma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period { return result; }

    let mut sum: f64 = data[..period].iter().sum();
    result[period - 1] = Some(sum / period as f64);

    for i in period..data.len() {
        sum += data[i] - data[i - period];
        result[i] = Some(sum / period as f64);
    }
    result
}

fn calc_ema(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if data.is_empty() || period == 0 { return result; }

    let multiplier = 2.0 / (period as f64 + 1.0);
    result[0] = Some(data[0]);

    for i in 1..data.len() {
        let prev = result[i - 1].unwrap_or(data[i]);
        result[i] = Some(data[i] * multiplier + prev * (1.0 - multiplier));
    }
    result
}

/// 返回 (DIF, DEA, 柱)，柱 = (DIF - DEA) * 2
fn calc_macd(data: &[f64], fast: usize, slow: usize, signal: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let ema_fast = calc_ema(data, fast);
    let ema_slow = calc_ema(data, slow);
    let n = data.len();

    let mut dif = vec![None; n];
    let mut dif_values = Vec::new();

    for i in 0..n {
        if let (Some(f), Some(s)) = (ema_fast[i], ema_slow[i]) {
            let d = f - s;
            dif[i] = Some(d);
            dif_values.push(d);
        }
    }

    let dea_raw = calc_ema(&dif_values, signal);
    let mut dea = vec![None; n];
    let mut hist = vec![None; n];
    let mut dea_idx = 0;

    for i in 0..n {
        if dif[i].is_some() && dea_idx < dea_raw.len() {
            dea[i] = dea_raw[dea_idx];
            if let (Some(d), Some(de)) = (dif[i], dea[i]) {
                hist[i] = Some((d - de) * 2.0);
            }
            dea_idx += 1;
        }
    }

    (dif, dea, hist)
}

fn calc_rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period + 1 { return result; }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..=period {
        let change = data[i] - data[i - 1];
        if change > 0.0 { avg_gain += change; }
        else { avg_loss += change.abs(); }
    }

    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..data.len() {
        let change = data[i] - data[i - 1];
        let (gain, loss) = if change > 0.0 { (change, 0.0) } else { (0.0, change.abs()) };

        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        result[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss.abs() < 1e-10 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
