//! `%s` template substitution for bind DNs and search filters

/// Substitute `value` for every `%s` in `template`.
///
/// `%%` produces a literal `%`. Any other `%` sequence is copied as is.
pub fn format_template(template: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                out.push_str(value);
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }

    out
}

/// Whether `template` contains at least one `%s` placeholder
pub fn has_placeholder(template: &str) -> bool {
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c == '%' && chars.next() == Some('s') {
            return true;
        }
    }
    false
}
