// Y-axis range and grid step selection

/// Value scale of the y-axis
#[derive(Debug, Clone, PartialEq)]
pub struct YScale {
    /// Next-to-last tick: the data maximum rounded down to its leading digit
    pub max_tick: f64,
    /// Value distance between two gridlines
    pub grid_step: f64,
    /// Value at the top of the chart frame
    pub max_value: f64,
    /// Labels for every gridline below the frame, bottom to top
    pub ticks: Vec<String>,
}

impl YScale {
    /// Choose a readable scale for data whose maximum is `max`.
    ///
    /// Maxima below 1 (including an all-zero table) use a zero `max_tick` so
    /// the scale never degenerates; the resulting `max_value` is at least 1.
    pub fn for_max(max: f64) -> Self {
        let max = if max.is_finite() && max > 0.0 { max } else { 0.0 };

        let max_tick = if max < 1.0 {
            0.0
        } else {
            let power_of_ten = power_of_ten_below(max);
            (max / power_of_ten).floor() * power_of_ten
        };

        let grid_step = snap_grid_step((max_tick / 10.0).floor());
        let max_value = max_tick + (((max.ceil() - max_tick) / grid_step).floor() + 1.0) * grid_step;

        let tick_count = (max_value / grid_step).round() as usize - 1;
        let ticks = (1..=tick_count)
            .map(|i| format_tick(i as f64 * grid_step))
            .collect();

        YScale {
            max_tick,
            grid_step,
            max_value,
            ticks,
        }
    }

    /// Label of the next-to-last tick, the widest number the axis shows
    pub fn max_tick_label(&self) -> String {
        format_tick(self.max_tick)
    }
}

/// Round a raw grid step up to 1, 5, 10, 25, 50 or 100.
/// Steps of 100 and more are kept as they are.
pub fn snap_grid_step(step: f64) -> f64 {
    if step <= 1.0 {
        1.0
    } else if step < 5.0 {
        5.0
    } else if step < 10.0 {
        10.0
    } else if step < 25.0 {
        25.0
    } else if step < 50.0 {
        50.0
    } else if step < 100.0 {
        100.0
    } else {
        step
    }
}

/// Largest power of ten not above `value` (`value` >= 1)
fn power_of_ten_below(value: f64) -> f64 {
    let mut exponent = value.log10().floor() as i32;
    // log10 may land just beside an exact power of ten
    if 10f64.powi(exponent + 1) <= value {
        exponent += 1;
    } else if 10f64.powi(exponent) > value {
        exponent -= 1;
    }
    10f64.powi(exponent)
}

fn format_tick(value: f64) -> String {
    format!("{:.0}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_grid_step() {
        let inputs = [0.4, 3.0, 7.0, 20.0, 40.0, 80.0, 150.0];
        let expected = [1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 150.0];
        for (input, want) in inputs.iter().zip(expected.iter()) {
            assert_eq!(snap_grid_step(*input), *want, "input {}", input);
        }
    }

    #[test]
    fn test_snap_boundaries() {
        assert_eq!(snap_grid_step(1.0), 1.0);
        assert_eq!(snap_grid_step(5.0), 10.0);
        assert_eq!(snap_grid_step(25.0), 50.0);
        assert_eq!(snap_grid_step(100.0), 100.0);
    }

    #[test]
    fn test_power_of_ten_below_exact_powers() {
        assert_eq!(power_of_ten_below(1.0), 1.0);
        assert_eq!(power_of_ten_below(1000.0), 1000.0);
        assert_eq!(power_of_ten_below(999.9), 100.0);
    }

    #[test]
    fn test_scale_for_sample_maximum() {
        let scale = YScale::for_max(424.1);
        assert_eq!(scale.max_tick, 400.0);
        assert_eq!(scale.grid_step, 50.0);
        assert_eq!(scale.max_value, 450.0);
        assert_eq!(scale.ticks.len(), 8);
        assert_eq!(scale.ticks.first().map(String::as_str), Some("50"));
        assert_eq!(scale.ticks.last().map(String::as_str), Some("400"));
    }

    #[test]
    fn test_scale_covers_maximum_and_divides_by_step() {
        for max in [1.0, 3.5, 9.99, 10.0, 17.3, 99.0, 100.0, 342.7, 1234.0, 56789.0] {
            let scale = YScale::for_max(max);
            assert!(scale.max_value >= max, "max {}", max);
            let steps = scale.max_value / scale.grid_step;
            assert_eq!(steps, steps.round(), "max {}", max);
        }
    }

    #[test]
    fn test_scale_for_large_values_keeps_step() {
        let scale = YScale::for_max(5000.0);
        assert_eq!(scale.max_tick, 5000.0);
        assert_eq!(scale.grid_step, 500.0);
        assert_eq!(scale.max_value, 5500.0);
    }

    #[test]
    fn test_tick_labels_beyond_integer_range() {
        let scale = YScale::for_max(5e19);
        assert_eq!(scale.grid_step, 5e18);
        assert_eq!(scale.ticks.len(), 10);
        assert_eq!(scale.ticks[0], "5000000000000000000");
        assert_eq!(scale.ticks[1], "10000000000000000000");
        assert_eq!(scale.ticks[9], "50000000000000000000");
        assert_eq!(scale.max_tick_label(), "50000000000000000000");
    }

    #[test]
    fn test_scale_all_zero_is_minimal() {
        let scale = YScale::for_max(0.0);
        assert_eq!(scale.max_tick, 0.0);
        assert_eq!(scale.grid_step, 1.0);
        assert_eq!(scale.max_value, 1.0);
        assert!(scale.ticks.is_empty());
    }

    #[test]
    fn test_scale_below_one() {
        let scale = YScale::for_max(0.4);
        assert_eq!(scale.max_value, 2.0);
        assert_eq!(scale.ticks, vec!["1".to_string()]);
    }

    #[test]
    fn test_scale_ignores_non_finite() {
        assert_eq!(YScale::for_max(f64::NAN).max_value, 1.0);
        assert_eq!(YScale::for_max(-5.0).max_value, 1.0);
    }
}
