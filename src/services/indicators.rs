/// Simple Moving Average (SMA)
/// Returns a vector aligned with `values`:
/// - `None` until enough values exist
/// - `Some(avg)` of the trailing `window` values after that
///
/// Windows are positional; gaps in the calendar are not considered.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    // Running sum carried through scan; the value that falls out of the window is subtracted.
    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }

            let out = if i + 1 >= window {
                Some(*sum / window as f64)
            } else {
                None
            };

            Some(out)
        })
        .collect()
}

/// Last element of a moving-average series, if it is defined.
pub fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series_close(actual: &[Option<f64>], expected: &[Option<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            match (a, e) {
                (Some(a), Some(e)) => assert!((a - e).abs() < 1e-9, "index {}: {} != {}", i, a, e),
                (None, None) => {}
                _ => panic!("index {}: {:?} != {:?}", i, a, e),
            }
        }
    }

    #[test]
    fn test_sma_hand_computed() {
        let result = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_series_close(&result, &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_constant_series() {
        let values = vec![42.5; 60];
        for period in [1, 5, 20, 50, 60] {
            let result = sma(&values, period);
            assert_eq!(result.len(), values.len());
            assert!(result[..period - 1].iter().all(Option::is_none));
            for v in &result[period - 1..] {
                assert!((v.unwrap() - 42.5).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sma_matches_window_mean() {
        let values: Vec<f64> = (0..120).map(|i| 100.0 + ((i * 37) % 23) as f64 * 0.75).collect();
        let period = 20;
        let result = sma(&values, period);

        for i in (period - 1)..values.len() {
            let window = &values[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            assert!((result[i].unwrap() - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sma_period_longer_than_series() {
        let result = sma(&[10.0, 11.0, 12.0], 50);
        assert_eq!(result, vec![None, None, None]);
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let values = [3.0, 1.5, 8.0];
        let result = sma(&values, 1);
        assert_series_close(&result, &[Some(3.0), Some(1.5), Some(8.0)]);
    }

    #[test]
    fn test_sma_zero_window_and_empty_input() {
        assert_eq!(sma(&[1.0, 2.0], 0), vec![None, None]);
        assert!(sma(&[], 20).is_empty());
    }

    #[test]
    fn test_latest() {
        assert_eq!(latest(&[None, Some(1.0), Some(2.0)]), Some(2.0));
        assert_eq!(latest(&[Some(1.0), None]), None);
        assert_eq!(latest(&[]), None);
    }
}
