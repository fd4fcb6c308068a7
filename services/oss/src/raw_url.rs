use osssign_core::{Error, Result};

/// RawUrl holds the undecoded path and query of a URI reference.
///
/// Components are split the RFC 3986 way (`scheme:`, `//authority`, path,
/// `?query`, `#fragment`) and borrowed from the input as written. Nothing is
/// normalized: an absolute URL without a path has an empty path, and a
/// relative reference such as `bucket/file` keeps its missing leading `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawUrl<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> RawUrl<'a> {
    pub fn parse(url: &'a str) -> Result<Self> {
        let invalid = |reason: &str| Error::url_invalid(format!("failed to parse url {url:?}: {reason}"));

        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };

        // A colon before the first `/` ends the scheme.
        let (scheme, rest) = match rest.find([':', '/']) {
            Some(i) if rest.as_bytes()[i] == b':' => (Some(&rest[..i]), &rest[i + 1..]),
            _ => (None, rest),
        };
        if let Some(scheme) = scheme {
            if !is_scheme(scheme) {
                return Err(invalid("illegal scheme"));
            }
        }

        let (authority, path) = match rest.strip_prefix("//") {
            Some(hier) => {
                let (authority, path) = hier.split_at(hier.find('/').unwrap_or(hier.len()));
                (Some(authority), path)
            }
            None => (None, rest),
        };
        if scheme.is_some() && authority.is_none() && !path.starts_with('/') {
            return Err(invalid("opaque urls have no path to sign"));
        }

        if let Some(authority) = authority {
            check(authority, Component::Authority).map_err(invalid)?;
        }
        check(path, Component::Path).map_err(invalid)?;
        if let Some(query) = query {
            check(query, Component::Query).map_err(invalid)?;
        }
        if let Some(fragment) = fragment {
            check(fragment, Component::Query).map_err(invalid)?;
        }

        Ok(Self { path, query })
    }
}

#[derive(Clone, Copy)]
enum Component {
    Authority,
    Path,
    Query,
}

fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

fn check(s: &str, component: Component) -> std::result::Result<(), &'static str> {
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '%' {
            let escaped = s.as_bytes().get(i + 1..i + 3);
            if !escaped.is_some_and(|e| e.iter().all(u8::is_ascii_hexdigit)) {
                return Err("malformed percent escape");
            }
            chars.nth(1);
            continue;
        }
        if !is_allowed(c, component) {
            return Err(match component {
                Component::Authority => "illegal character in authority",
                Component::Path => "illegal character in path",
                Component::Query => "illegal character in query or fragment",
            });
        }
    }

    if let Component::Authority = component {
        if let Some(open) = s.find('[') {
            if !s[open..].contains(']') {
                return Err("unterminated ip literal in authority");
            }
        }
    }

    Ok(())
}

fn is_allowed(c: char, component: Component) -> bool {
    if !c.is_ascii() {
        return !c.is_control() && !c.is_whitespace();
    }

    // Unreserved marks and the reserved set shared by every component.
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')'
                | ';' | ':' | '@' | '&' | '=' | '+' | '$' | ','
        )
        || match component {
            Component::Authority => matches!(c, '[' | ']'),
            Component::Path => c == '/',
            Component::Query => matches!(c, '/' | '?' | '[' | ']'),
        }
}
