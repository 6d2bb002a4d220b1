/// Format `value` with comma-grouped thousands and `decimals` places.
///
/// ```
/// use spend_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    // Exact decimal midpoints such as 1.005 round away from zero.
    let scale = 10_f64.powi(decimals as i32);
    let rounded = (value.abs() * scale * (1.0 + f64::EPSILON)).round() / scale;
    let text = format!("{:.*}", decimals as usize, rounded);

    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Format a spending amount with two decimals and thousands separators.
///
/// Amounts carry no currency symbol; the input file is single-currency.
///
/// ```
/// use spend_core::formatting::format_amount;
///
/// assert_eq!(format_amount(1234.5), "1,234.50");
/// ```
pub fn format_amount(amount: f64) -> String {
    format_number(amount, 2)
}

/// Format a transaction count with thousands separators.
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Compact axis label: `950`, `1.2k`, `3.4M`.
///
/// ```
/// use spend_core::formatting::format_axis_value;
///
/// assert_eq!(format_axis_value(950.0), "950");
/// assert_eq!(format_axis_value(1240.0), "1.2k");
/// ```
pub fn format_axis_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if abs >= 10.0 || value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// `"1234567"` -> `"1,234,567"`. Expects ASCII digits only.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
