//! HTML fragment helpers and locale-style number formatting

/// Escape text for use in element content and quoted attributes
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Digit grouping conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLocale {
    /// `1,234.56`
    EnUs,
    /// `1’234.56`
    DeCh,
}

impl NumberLocale {
    fn group_separator(self) -> &'static str {
        match self {
            Self::EnUs => ",",
            Self::DeCh => "\u{2019}",
        }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Format with grouping and between `min_fraction` and `max_fraction`
/// decimals, dropping trailing zeros beyond the minimum
#[must_use]
pub fn format_number(
    value: f64,
    locale: NumberLocale,
    min_fraction: usize,
    max_fraction: usize,
) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = fraction.to_string();
    while fraction.len() > min_fraction && fraction.ends_with('0') {
        fraction.pop();
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(integer, locale.group_separator()));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// Whole number with en-US grouping
#[must_use]
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string(), NumberLocale::EnUs.group_separator())
}

/// Round half up, the way display temperatures are rounded
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Signed percentage with two decimals, e.g. `+1.50%`
#[must_use]
pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Market capitalisation abbreviated to T/B/M with one decimal
#[must_use]
pub fn format_market_cap(value: f64) -> String {
    if value >= 1e12 {
        format!("{:.1}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else {
        format_number(value, NumberLocale::EnUs, 0, 3)
    }
}

/// Spinner with a message
#[must_use]
pub fn loading_block(message: &str) -> String {
    format!(
        r#"<div class="loading-state"><div class="spinner"></div><p>{}</p></div>"#,
        escape_html(message)
    )
}

/// Error panel with an optional retry control targeting `retry_tab`
#[must_use]
pub fn error_block(icon: &str, title: &str, message: &str, retry_tab: Option<&str>) -> String {
    let mut html = String::new();
    html.push_str(r#"<div class="error-container">"#);
    html.push_str(&format!(r#"<div class="error-icon">{icon}</div>"#));
    html.push_str(&format!("<h3>{}</h3>", escape_html(title)));
    html.push_str(&format!("<p>{}</p>", escape_html(message)));
    if let Some(tab) = retry_tab {
        html.push_str(&format!(
            r#"<button class="retry-btn" data-retry="{}">🔄 Try Again</button>"#,
            escape_html(tab)
        ));
    }
    html.push_str("</div>");
    html
}

/// Empty-result notice
#[must_use]
pub fn no_results(title: &str, hint: &str) -> String {
    format!(
        r#"<div class="no-results"><h3>{}</h3><p>{}</p></div>"#,
        escape_html(title),
        escape_html(hint)
    )
}
