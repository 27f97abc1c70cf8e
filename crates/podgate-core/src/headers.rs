//! Parsing of the `Link` and `WAC-Allow` response headers.

use serde::{Deserialize, Serialize};

use crate::access::{AccessModes, Mode};
use crate::iri::ResourceIri;

// ============================================================================
// Link
// ============================================================================

/// One `Link` header entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// Target IRI, resolved against the request URL.
    pub target: String,
    /// Relation types (`rel` may list several, space-separated).
    pub rels: Vec<String>,
}

impl Link {
    /// Whether this entry carries relation `rel`.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parse one `Link` header value.
///
/// Entries whose target cannot be resolved against `base` are skipped.
pub fn parse_link_header(value: &str, base: &ResourceIri) -> Vec<Link> {
    split_outside(value, ',')
        .into_iter()
        .filter_map(|entry| parse_link_value(entry, base))
        .collect()
}

fn parse_link_value(entry: &str, base: &ResourceIri) -> Option<Link> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    let Some(rest) = entry.strip_prefix('<') else {
        log::warn!("Ignoring malformed Link entry: {entry}");
        return None;
    };
    let Some(end) = rest.find('>') else {
        log::warn!("Ignoring malformed Link entry: {entry}");
        return None;
    };
    let reference = &rest[..end];
    let target = match base.as_url().join(reference) {
        Ok(url) => url.to_string(),
        Err(e) => {
            log::warn!("Ignoring Link target <{reference}>: {e}");
            return None;
        }
    };

    let mut rels = Vec::new();
    for param in split_outside(&rest[end + 1..], ';') {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("rel") {
            rels.extend(unquote(raw).split_whitespace().map(str::to_string));
        }
    }
    Some(Link { target, rels })
}

/// Split on `sep` where it is outside `<...>` and `"..."`.
fn split_outside(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_angle = false;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '"' if !in_angle => in_quote = !in_quote,
            '<' if !in_quote => in_angle = true,
            '>' if !in_quote => in_angle = false,
            c if c == sep && !in_angle && !in_quote => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    raw.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw)
}

// ============================================================================
// WAC-Allow
// ============================================================================

/// Access the server reports for the current requester and for everyone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveAccess {
    /// Access of the agent making the request.
    pub user: AccessModes,
    /// Access of unauthenticated requests.
    pub public: AccessModes,
}

/// Parse a `WAC-Allow` header value such as
/// `user="read write append control",public="read"`.
///
/// Unknown groups are ignored. A missing or unparsable group yields no
/// access for that group.
pub fn parse_wac_allow(value: &str) -> EffectiveAccess {
    let mut access = EffectiveAccess::default();
    for entry in split_outside(value, ',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((group, raw)) = entry.split_once('=') else {
            log::warn!("Ignoring malformed WAC-Allow entry: {entry}");
            continue;
        };
        let raw = raw.trim();
        if !(raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"')) {
            log::warn!("Ignoring unquoted WAC-Allow entry: {entry}");
            continue;
        }
        let modes = parse_mode_list(&raw[1..raw.len() - 1]);
        match group.trim().to_ascii_lowercase().as_str() {
            "user" => access.user = modes,
            "public" => access.public = modes,
            other => log::debug!("Ignoring WAC-Allow group '{other}'"),
        }
    }
    access
}

fn parse_mode_list(list: &str) -> AccessModes {
    list.split_whitespace()
        .filter_map(|word| {
            let mode = Mode::ALL
                .into_iter()
                .find(|m| m.keyword().eq_ignore_ascii_case(word));
            if mode.is_none() {
                log::warn!("Ignoring unknown WAC-Allow mode '{word}'");
            }
            mode
        })
        .collect::<AccessModes>()
        .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ResourceIri {
        ResourceIri::parse("https://pod.example/notes/a.ttl").unwrap()
    }

    #[test]
    fn test_parse_link_relative_target() {
        let links = parse_link_header(r#"<a.ttl.acl>; rel="acl""#, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "https://pod.example/notes/a.ttl.acl");
        assert!(links[0].has_rel("acl"));
    }

    #[test]
    fn test_parse_link_multiple_entries() {
        let header = concat!(
            r#"<http://www.w3.org/ns/pim/space#Storage>; rel="type", "#,
            r#"</notes/a.ttl.acl>; rel="acl", "#,
            r#"<http://www.w3.org/ns/ldp#Resource>; rel=type"#
        );
        let links = parse_link_header(header, &base());
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].target, "http://www.w3.org/ns/pim/space#Storage");
        assert!(links[0].has_rel("type"));
        assert!(links[2].has_rel("type"));
        assert_eq!(links[1].target, "https://pod.example/notes/a.ttl.acl");
    }

    #[test]
    fn test_parse_link_comma_inside_target_and_quotes() {
        let header = r#"<https://pod.example/x,y>; rel="acl"; title="a, b""#;
        let links = parse_link_header(header, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "https://pod.example/x,y");
    }

    #[test]
    fn test_parse_link_space_separated_rels() {
        let links = parse_link_header(r#"<.acl>; rel="acl describedby""#, &base());
        assert!(links[0].has_rel("acl"));
        assert!(links[0].has_rel("describedby"));
    }

    #[test]
    fn test_parse_link_skips_malformed() {
        let links = parse_link_header(r#"no-brackets; rel="acl", <ok>; rel="acl""#, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "https://pod.example/notes/ok");
    }

    #[test]
    fn test_parse_wac_allow() {
        let access = parse_wac_allow(r#"user="read write append control",public="read""#);
        assert_eq!(access.user, AccessModes::ALL);
        assert_eq!(access.public, AccessModes::READ);
    }

    #[test]
    fn test_wac_allow_write_implies_append() {
        let access = parse_wac_allow(r#"user="write""#);
        assert!(access.user.write);
        assert!(access.user.append);
        assert_eq!(access.public, AccessModes::NONE);
    }

    #[test]
    fn test_wac_allow_unparsable_entries() {
        let access = parse_wac_allow(r#"user=read,public"#);
        assert_eq!(access, EffectiveAccess::default());
        let access = parse_wac_allow("");
        assert_eq!(access, EffectiveAccess::default());
    }

    #[test]
    fn test_wac_allow_ignores_unknown_groups_and_modes() {
        let access = parse_wac_allow(r#" owner="control", USER="read fly" , public="" "#);
        assert_eq!(access.user, AccessModes::READ);
        assert_eq!(access.public, AccessModes::NONE);
    }
}
