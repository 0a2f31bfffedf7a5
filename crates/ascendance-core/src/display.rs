//! Number formatting for the UI.
//!
//! Resource panels show whole numbers truncated toward zero; rates and small
//! currencies show a fixed number of decimals. Neither changes the stored
//! values.

use rust_decimal::{Decimal, RoundingStrategy};

/// Integer part of `value`, as shown on resource counters.
pub fn whole(value: Decimal) -> String {
    value.trunc().normalize().to_string()
}

/// `value` rounded half away from zero to exactly `places` decimals.
pub fn fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let prec = usize::try_from(places).unwrap_or(0);
    format!("{rounded:.prec$}")
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn whole_truncates() {
        assert_eq!(whole(dec!(19.95)), "19");
        assert_eq!(whole(dec!(1.0997142857)), "1");
        assert_eq!(whole(dec!(350)), "350");
        assert_eq!(whole(dec!(0.4)), "0");
    }

    #[test]
    fn fixed_pads_and_rounds() {
        assert_eq!(fixed(dec!(0.05), 2), "0.05");
        assert_eq!(fixed(dec!(12), 2), "12.00");
        assert_eq!(fixed(dec!(1.005), 2), "1.01");
        assert_eq!(fixed(dec!(3.14159), 1), "3.1");
    }
}
