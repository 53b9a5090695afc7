/// Round to two decimal places, the precision every reported money and
/// nutrient value carries.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(0.0), 0.0);
    }
}
