//! Relative reference resolution for `xml:base`
//!
//! Follows the reference resolution algorithm of RFC 3986 section 5.2.
//! A base without a scheme cannot anchor anything, so the reference is
//! returned unchanged in that case.

struct Parts<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn split(uri: &str) -> Parts<'_> {
    let (rest, fragment) = match uri.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (uri, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (rest, None),
    };
    let (scheme, rest) = match rest.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => (Some(scheme), rest),
        _ => (None, rest),
    };
    let (authority, path) = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find('/').unwrap_or(after.len());
            (Some(&after[..end]), &after[end..])
        }
        None => (None, rest),
    };
    Parts {
        scheme,
        authority,
        path,
        query,
        fragment,
    }
}

fn remove_dot_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let floor = usize::from(absolute);
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut out: Vec<&str> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.into_iter().enumerate() {
        match segment {
            "." => {}
            ".." => {
                if out.len() > floor {
                    out.pop();
                }
            }
            s => {
                out.push(s);
                continue;
            }
        }
        // a trailing dot segment leaves the path ending in '/'
        if i == last {
            out.push("");
        }
    }
    out.join("/")
}

fn merge(base: &Parts<'_>, reference: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        return format!("/{}", reference);
    }
    match base.path.rfind('/') {
        Some(slash) => format!("{}{}", &base.path[..=slash], reference),
        None => reference.to_string(),
    }
}

fn compose(scheme: &str, authority: Option<&str>, path: &str, query: Option<&str>, fragment: Option<&str>) -> String {
    let mut out = String::with_capacity(scheme.len() + path.len() + 16);
    out.push_str(scheme);
    out.push(':');
    if let Some(authority) = authority {
        out.push_str("//");
        out.push_str(authority);
    }
    out.push_str(path);
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Resolve `reference` against `base`
pub(crate) fn resolve(base: &str, reference: &str) -> String {
    let r = split(reference);
    if let Some(scheme) = r.scheme {
        return compose(scheme, r.authority, &remove_dot_segments(r.path), r.query, r.fragment);
    }
    let b = split(base);
    let Some(scheme) = b.scheme else {
        return reference.to_string();
    };
    if r.authority.is_some() {
        return compose(scheme, r.authority, &remove_dot_segments(r.path), r.query, r.fragment);
    }
    let (path, query) = if r.path.is_empty() {
        (b.path.to_string(), r.query.or(b.query))
    } else if r.path.starts_with('/') {
        (remove_dot_segments(r.path), r.query)
    } else {
        (remove_dot_segments(&merge(&b, r.path)), r.query)
    };
    compose(scheme, b.authority, &path, query, r.fragment)
}
