use super::{PriceRange, Tick, price_to_y};
use crate::util::count_decimals;

/// Vertical room a price label needs before another tick fits.
pub const MIN_TICK_SPACING: f32 = 28.0;

/// Generates evenly spaced price-axis ticks over `range`, highest price
/// first. `requested` is capped by how many labels fit in `height`; every
/// label carries the same number of decimals so the column aligns.
pub fn generate_price_ticks(
    range: &PriceRange,
    height: f32,
    requested: usize,
) -> Vec<Tick> {
    if height <= 0.0 || requested < 2 || !range.range.is_finite() || range.range <= 0.0 {
        return vec![];
    }

    let fit_by_height = ((height / MIN_TICK_SPACING).floor() as usize).max(2);
    let count = requested.min(fit_by_height);

    let decimals = label_decimals(range);
    let step = range.range / (count - 1) as f32;

    (0..count)
        .map(|i| {
            let price = range.max - i as f32 * step;
            Tick {
                position: price_to_y(price, height, range),
                label: format!("{price:.decimals$}"),
            }
        })
        .collect()
}

/// Enough decimals to tell adjacent ticks apart, bounded to keep labels
/// readable.
fn label_decimals(range: &PriceRange) -> usize {
    let from_bounds = count_decimals(range.min).max(count_decimals(range.max));
    let from_span = if range.range >= 1.0 {
        2
    } else {
        // Small spans need more precision than the bounds alone show.
        (-range.range.log10()).ceil() as usize + 2
    };
    from_bounds.min(8).max(from_span.min(8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_split_the_range_evenly() {
        let range = PriceRange::from_min_max(100.0, 200.0);
        let got = generate_price_ticks(&range, 400.0, 5);

        assert_eq!(got.len(), 5);
        assert_eq!(got[0].label, "200.00");
        assert_eq!(got[2].label, "150.00");
        assert_eq!(got[4].label, "100.00");
        // Highest price sits at the top of the canvas.
        assert_eq!(got[0].position, 0.0);
        assert_eq!(got[4].position, 400.0);
    }

    #[test]
    fn short_canvas_caps_the_tick_count() {
        let range = PriceRange::from_min_max(0.0, 10.0);
        let got = generate_price_ticks(&range, 70.0, 12);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn tiny_spans_get_extra_decimals() {
        let range = PriceRange::from_min_max(0.0001, 0.0002);
        let got = generate_price_ticks(&range, 300.0, 3);

        assert_eq!(got.len(), 3);
        let mid: f32 = got[1].label.parse().unwrap();
        assert!((mid - 0.00015).abs() < 1e-6);
    }

    #[test]
    fn invalid_inputs_yield_no_ticks() {
        let range = PriceRange::from_min_max(100.0, 200.0);
        assert!(generate_price_ticks(&range, 0.0, 5).is_empty());
        assert!(generate_price_ticks(&range, 300.0, 1).is_empty());

        let nan = PriceRange {
            min: f32::NAN,
            max: f32::NAN,
            range: f32::NAN,
        };
        assert!(generate_price_ticks(&nan, 300.0, 5).is_empty());
    }
}
