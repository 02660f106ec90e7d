//! Number and label formatting for tooltips and labels

/// Fixed-point with `,` thousands separators, e.g. `1,234.50`
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `precision` significant digits, switching to exponent form for very large
/// or very small magnitudes (`1.23e+5`)
pub fn to_precision(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }

    let mut exponent = value.abs().log10().floor() as i32;
    // Rounding can carry into the next power of ten (99.96 -> 100.0)
    let scale = 10f64.powi(exponent - precision as i32 + 1);
    if ((value.abs() / scale).round() * scale).abs() >= 10f64.powi(exponent + 1) {
        exponent += 1;
    }

    if exponent < -6 || exponent >= precision as i32 {
        let formatted = format!("{:.*e}", precision - 1, value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, value)
}

/// Escape text for inclusion in tooltip HTML
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Shorten long arc labels: more than `max` chars keeps `keep` and appends `...`
pub fn truncate_label(label: &str, max: usize, keep: usize) -> String {
    if label.chars().count() > max {
        let mut short: String = label.chars().take(keep).collect();
        short.push_str("...");
        short
    } else {
        label.to_string()
    }
}
