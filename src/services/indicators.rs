//! 技术指标计算
//!
//! 输入为按日期升序的收盘价序列，每个指标只取序列最后一个值。
//! 窗口内数据不足或结果不是有限数时返回 None，不影响其他指标。

use crate::models::{PriceSnapshot, TechnicalIndicators};

pub const RSI_WINDOW: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;
pub const VOLATILITY_WINDOW: usize = 30;
/// 年化使用的交易日数
pub const TRADING_DAYS: f64 = 252.0;

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// 最后 window 个值，不足时为 None
fn tail(values: &[f64], window: usize) -> Option<&[f64]> {
    (window > 0 && values.len() >= window).then(|| &values[values.len() - window..])
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// 简单移动平均
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    tail(values, window).map(mean).and_then(finite)
}

/// 样本标准差（n - 1），窗口至少 2
pub fn rolling_std(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 {
        return None;
    }
    let slice = tail(values, window)?;
    let avg = mean(slice);
    let variance = slice.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (window - 1) as f64;
    finite(variance.sqrt())
}

/// 指数移动平均序列，α = 2 / (span + 1)，以第一个值为初值递推（不做偏差修正）
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut series = Vec::with_capacity(values.len());
    for &value in values {
        let next = match series.last() {
            Some(prev) => alpha * value + (1.0 - alpha) * prev,
            None => value,
        };
        series.push(next);
    }
    series
}

pub fn ema(values: &[f64], span: usize) -> Option<f64> {
    ema_series(values, span).last().copied().and_then(finite)
}

/// RSI
///
/// 第一根K线没有涨跌，按 0 计入；涨跌幅均值使用简单平均。
/// 平均跌幅为 0 时：平均涨幅大于 0 记为 100，否则（价格不变）无法定义，返回 None
pub fn rsi(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }

    let (mut gains, mut losses) = (0.0, 0.0);
    let start = closes.len() - window;
    for i in start..closes.len() {
        let delta = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        if delta > 0.0 {
            gains += delta;
        } else if delta < 0.0 {
            losses -= delta;
        }
    }
    let avg_gain = gains / window as f64;
    let avg_loss = losses / window as f64;

    if avg_loss == 0.0 {
        return (avg_gain > 0.0).then_some(100.0);
    }
    finite(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

/// MACD 线及信号线
pub fn macd(closes: &[f64]) -> (Option<f64>, Option<f64>) {
    let fast = ema_series(closes, MACD_FAST);
    let slow = ema_series(closes, MACD_SLOW);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, MACD_SIGNAL);
    (line.last().copied().and_then(finite), signal)
}

/// 布林带上下轨
pub fn bollinger(closes: &[f64]) -> (Option<f64>, Option<f64>) {
    match (sma(closes, BOLLINGER_WINDOW), rolling_std(closes, BOLLINGER_WINDOW)) {
        (Some(mid), Some(std)) => (
            Some(mid + BOLLINGER_WIDTH * std),
            Some(mid - BOLLINGER_WIDTH * std),
        ),
        _ => (None, None),
    }
}

/// 年化波动率：日收益率的滚动样本标准差 × √252
pub fn volatility(closes: &[f64], window: usize) -> Option<f64> {
    let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
    rolling_std(&returns, window)
        .map(|std| std * TRADING_DAYS.sqrt())
        .and_then(finite)
}

/// 计算全部技术指标
pub fn compute(closes: &[f64]) -> TechnicalIndicators {
    let (macd_line, macd_signal) = macd(closes);
    let (bollinger_upper, bollinger_lower) = bollinger(closes);

    TechnicalIndicators {
        rsi: rsi(closes, RSI_WINDOW),
        macd: macd_line,
        macd_signal,
        bollinger_upper,
        bollinger_lower,
        sma_20: sma(closes, 20),
        sma_50: sma(closes, 50),
        sma_200: sma(closes, 200),
        ema_12: ema(closes, 12),
        ema_26: ema(closes, 26),
        volatility_30d: volatility(closes, VOLATILITY_WINDOW),
    }
}

/// 价格快照，序列为空时返回 None
pub fn price_snapshot(closes: &[f64]) -> Option<PriceSnapshot> {
    let current_price = *closes.last()?;
    let previous_close = if closes.len() > 1 { closes[closes.len() - 2] } else { 0.0 };
    let price_change = current_price - previous_close;
    let percent_change = if previous_close != 0.0 {
        price_change / previous_close * 100.0
    } else {
        0.0
    };

    Some(PriceSnapshot {
        current_price,
        previous_close,
        price_change,
        percent_change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let value = actual.expect("indicator should be available");
        assert!((value - expected).abs() < 1e-9, "{} != {}", value, expected);
    }

    fn rising(n: usize) -> Vec<f64> {
        (1..=n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_rsi_strictly_rising_is_100() {
        assert_eq!(rsi(&rising(20), RSI_WINDOW), Some(100.0));
    }

    #[test]
    fn test_rsi_flat_is_unavailable() {
        assert_eq!(rsi(&[50.0; 20], RSI_WINDOW), None);
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // 窗口 2：涨 1、跌 1
        approx(rsi(&[1.0, 2.0, 1.0], 2), 50.0);
        // 窗口包含第一根K线时按 0 计入
        approx(rsi(&[10.0, 13.0], 2), 100.0);
        // 平均涨幅 1/3、平均跌幅 2/3 -> RS = 0.5
        approx(rsi(&[10.0, 11.0, 9.0, 9.0], 3), 100.0 - 100.0 / 1.5);
    }

    #[test]
    fn test_rsi_needs_full_window() {
        assert_eq!(rsi(&rising(13), RSI_WINDOW), None);
        assert!(rsi(&rising(14), RSI_WINDOW).is_some());
    }

    #[test]
    fn test_sma_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        approx(sma(&values, 8), 5.0);
        approx(sma(&values, 2), 8.0);
        approx(rolling_std(&values, 8), (32.0f64 / 7.0).sqrt());
        assert_eq!(sma(&values, 9), None);
        assert_eq!(rolling_std(&values, 1), None);
    }

    #[test]
    fn test_ema_recursion() {
        let series = ema_series(&[1.0, 2.0, 3.0], 3);
        assert_eq!(series, vec![1.0, 1.5, 2.25]);
        assert_eq!(ema(&[], 12), None);
    }

    #[test]
    fn test_constant_series() {
        let closes = [250.0; 40];
        let indicators = compute(&closes);

        approx(indicators.macd, 0.0);
        approx(indicators.macd_signal, 0.0);
        approx(indicators.bollinger_upper, 250.0);
        approx(indicators.bollinger_lower, 250.0);
        approx(indicators.sma_20, 250.0);
        approx(indicators.ema_26, 250.0);
        approx(indicators.volatility_30d, 0.0);
        assert_eq!(indicators.sma_50, None);
        assert_eq!(indicators.sma_200, None);
        assert_eq!(indicators.rsi, None);
    }

    #[test]
    fn test_partial_availability_on_short_history() {
        let indicators = compute(&rising(25));

        assert_eq!(indicators.rsi, Some(100.0));
        assert!(indicators.sma_20.is_some());
        assert!(indicators.bollinger_upper.is_some());
        assert!(indicators.ema_12.is_some());
        assert!(indicators.macd.is_some());
        assert_eq!(indicators.sma_50, None);
        assert_eq!(indicators.volatility_30d, None);
    }

    #[test]
    fn test_volatility_window() {
        assert_eq!(volatility(&rising(30), VOLATILITY_WINDOW), None);
        assert!(volatility(&rising(31), VOLATILITY_WINDOW).is_some());

        // 收益率交替 +10% / -10%
        let mut closes = vec![100.0];
        for i in 0..30 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last * 1.1 } else { last * 0.9 });
        }
        let returns = [0.1, -0.1].repeat(15);
        let expected = rolling_std(&returns, 30).unwrap() * 252f64.sqrt();
        let actual = volatility(&closes, VOLATILITY_WINDOW).unwrap();
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn test_price_snapshot() {
        let snapshot = price_snapshot(&[0.0, 100.0]).unwrap();
        assert_eq!(snapshot.previous_close, 0.0);
        assert_eq!(snapshot.price_change, 100.0);
        assert_eq!(snapshot.percent_change, 0.0);

        let snapshot = price_snapshot(&[200.0, 210.0]).unwrap();
        approx(Some(snapshot.percent_change), 5.0);
        approx(Some(snapshot.price_change), 10.0);

        let single = price_snapshot(&[42.0]).unwrap();
        assert_eq!(single.previous_close, 0.0);
        assert_eq!(single.percent_change, 0.0);

        assert!(price_snapshot(&[]).is_none());
    }
}
