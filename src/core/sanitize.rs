// src/core/sanitize.rs

/// Collapse whitespace runs (including non-breaking spaces) to one space, trimmed.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Site-relative form of a link: scheme, host, leading slash, query and
/// fragment removed. `https://host/rider/x?y#z` → `rider/x`.
pub fn site_relative(href: &str, base: &str) -> String {
    let href = href.trim();
    let href = href.strip_prefix(base).unwrap_or(href);
    let href = match href.find("://") {
        Some(i) => href[i + 3..].find('/').map_or("", |j| &href[i + 3 + j..]),
        None => href,
    };
    let end = href.find(['?', '#']).unwrap_or(href.len());
    s!(href[..end].trim_matches('/'))
}
