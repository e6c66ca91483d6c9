/// Render a measurement in shortest round-trip form, always keeping a
/// decimal point (`1.0`, `0.25`, `10.959762159762974`).
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// Render a height without a trailing `.0` for whole numbers (`80`, `80.5`).
pub fn format_height(height: f64) -> String {
    format!("{}", height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.0), "1.0");
        assert_eq!(format_value(-0.5), "-0.5");
        assert_eq!(format_value(25.43), "25.43");
        assert_eq!(format_value(101325.0), "101325.0");
    }

    #[test]
    fn test_format_height() {
        assert_eq!(format_height(80.0), "80");
        assert_eq!(format_height(80.5), "80.5");
    }
}
