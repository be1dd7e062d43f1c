/// Deterministic, backend-independent label width estimate.
#[must_use]
pub fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' | ':' => 0.34,
            '-' | '+' | '%' | '/' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

/// Line height used for stacked labels (legend rows, tooltip lines).
#[must_use]
pub fn line_height_px(font_size_px: f64) -> f64 {
    (font_size_px * 1.3).ceil()
}

#[cfg(test)]
mod tests {
    use super::estimate_text_width_px;

    #[test]
    fn width_grows_with_text_and_never_drops_below_one_em() {
        let short = estimate_text_width_px("1", 12.0);
        let long = estimate_text_width_px("1234.56", 12.0);
        assert_eq!(short, 12.0);
        assert!(long > short);
    }
}
