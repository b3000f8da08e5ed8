//! Tag-level scanning over the scraped documents.
//!
//! The per-item documents are a mix of XML islands, embedded HTML tooltip
//! markup and script text; they are too loose for a strict parser, so this
//! module slices them with forward scans. Matching is case-sensitive, which
//! the source format guarantees (all tags are lower-case).

/// Inner text of the first `<tag>...</tag>` element, with a CDATA wrapper
/// unwrapped if present. Returns `None` when the tag is absent.
pub fn tag_text<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    let inner = block_inner(doc, tag)?;
    let inner = inner.trim();
    let inner = inner
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(inner);
    Some(inner)
}

/// Value of `attr` on the first `<tag ...>` element.
pub fn tag_attr<'a>(doc: &'a str, tag: &str, attr: &str) -> Option<&'a str> {
    let open = find_open_tag(doc, tag)?;
    let tag_src = &doc[open..doc[open..].find('>')? + open];
    attr_value(tag_src, attr)
}

/// Flattened text of the first element whose `class` attribute contains
/// `class_name` (any tag).
pub fn class_text(doc: &str, class_name: &str) -> Option<String> {
    class_block(doc, class_name).map(strip_tags)
}

/// Raw inner slice of the first element whose `class` attribute contains
/// `class_name` (any tag).
pub fn class_block<'a>(doc: &'a str, class_name: &str) -> Option<&'a str> {
    let mut rest = doc;
    let mut offset = 0;
    while let Some(n) = rest.find('<') {
        let tag_end = match rest[n..].find('>') {
            Some(e) => n + e,
            None => return None,
        };
        let tag_src = &rest[n..tag_end];
        if !tag_src.starts_with("</") && !tag_src.starts_with("<!") {
            if let Some(classes) = attr_value(tag_src, "class") {
                if classes.split_whitespace().any(|c| c == class_name) {
                    let name_end = tag_src[1..]
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .map(|i| i + 1)
                        .unwrap_or(tag_src.len());
                    let tag_name = &tag_src[1..name_end];
                    let abs = offset + n;
                    return block_inner(&doc[abs..], tag_name);
                }
            }
        }
        offset += n + 1;
        rest = &rest[n + 1..];
    }
    None
}

/// Inner slice of the first `<tag>...</tag>` block.
pub fn first_block<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    block_inner(doc, tag)
}

/// Text that immediately follows the annotation comment `<!--name-->`, up to
/// the next tag. The tooltip uses these markers for flags like bind mode.
pub fn comment_text<'a>(doc: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("<!--{name}-->");
    let start = doc.find(&marker)? + marker.len();
    let end = doc[start..].find('<').map(|n| start + n).unwrap_or(doc.len());
    Some(&doc[start..end])
}

/// Inner slices of every `<tag>...</tag>` block, in document order.
pub fn blocks<'a>(doc: &'a str, tag: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut rest = doc;
    while let Some(inner) = block_inner(rest, tag) {
        out.push(inner);
        // Continue after the inner slice; the close tag is shorter than
        // any possible following open tag match we could miss.
        let advance = inner.as_ptr() as usize - rest.as_ptr() as usize + inner.len();
        rest = &rest[advance..];
    }
    out
}

/// Split the first `<tag>...</tag>` block out of `slice`: returns the
/// block's flattened text and the slice with the whole block removed.
pub fn take_block(slice: &str, tag: &str) -> Option<(String, String)> {
    let open = find_open_tag(slice, tag)?;
    let inner = block_inner(&slice[open..], tag)?;
    let inner_start = inner.as_ptr() as usize - slice.as_ptr() as usize;
    let close = format!("</{tag}>");
    let after = slice[inner_start + inner.len()..]
        .find('>')
        .map(|n| inner_start + inner.len() + n + 1)
        .unwrap_or(slice.len());
    debug_assert!(slice[inner_start + inner.len()..].starts_with(&close) || after == slice.len());
    let mut remainder = String::with_capacity(slice.len());
    remainder.push_str(&slice[..open]);
    remainder.push_str(&slice[after..]);
    Some((strip_tags(inner), remainder))
}

/// Remove every `<...>` run and decode the handful of entities the source
/// emits.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    decode_entities(&out)
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Byte offset of the first `<tag>` or `<tag ...>` opener.
fn find_open_tag(doc: &str, tag: &str) -> Option<usize> {
    let needle = format!("<{tag}");
    let mut from = 0;
    while let Some(n) = doc[from..].find(&needle) {
        let at = from + n;
        match doc[at + needle.len()..].chars().next() {
            Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('/') => return Some(at),
            _ => from = at + 1,
        }
    }
    None
}

/// Inner slice of the first `<tag>...</tag>` block, depth-aware so nested
/// same-name elements stay inside.
fn block_inner<'a>(doc: &'a str, tag: &str) -> Option<&'a str> {
    let open_at = find_open_tag(doc, tag)?;
    let open_end = open_at + doc[open_at..].find('>')?;
    if doc[open_at..open_end].ends_with('/') {
        // Self-closing, no inner text.
        return Some(&doc[open_end..open_end]);
    }
    let start = open_end + 1;
    let close = format!("</{tag}>");
    let mut depth = 1;
    let mut at = start;
    loop {
        let next_close = doc[at..].find(&close)?;
        let next_open = find_open_tag(&doc[at..], tag);
        match next_open {
            Some(o) if o < next_close => {
                let inner_end = at + o + doc[at + o..].find('>')?;
                if !doc[at + o..inner_end].ends_with('/') {
                    depth += 1;
                }
                at = inner_end + 1;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(&doc[start..at + next_close]);
                }
                at = at + next_close + close.len();
            }
        }
    }
}

fn attr_value<'a>(tag_src: &'a str, attr: &str) -> Option<&'a str> {
    for quote in ['"', '\''] {
        let needle = format!("{attr}={quote}");
        if let Some(n) = tag_src.find(&needle) {
            let start = n + needle.len();
            let end = tag_src[start..].find(quote)? + start;
            return Some(&tag_src[start..end]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_text_plain_and_cdata() {
        let doc = "<item><name><![CDATA[Hanzo Sword]]></name><icon>inv_sword</icon></item>";
        assert_eq!(tag_text(doc, "name"), Some("Hanzo Sword"));
        assert_eq!(tag_text(doc, "icon"), Some("inv_sword"));
        assert_eq!(tag_text(doc, "level"), None);
    }

    #[test]
    fn tag_attr_reads_id() {
        let doc = r#"<class id="2">Weapons</class><level id="60"/>"#;
        assert_eq!(tag_attr(doc, "class", "id"), Some("2"));
        assert_eq!(tag_attr(doc, "level", "id"), Some("60"));
        assert_eq!(tag_attr(doc, "quality", "id"), None);
    }

    #[test]
    fn class_text_flattens_nested() {
        let doc = r#"<span class="whtt-droppedby">Dropped by: <a href="x">Onyxia</a></span>"#;
        assert_eq!(
            class_text(doc, "whtt-droppedby").as_deref(),
            Some("Dropped by: Onyxia")
        );
        assert_eq!(class_text(doc, "missing"), None);
    }

    #[test]
    fn class_block_returns_raw_inner() {
        let doc = r#"<div class="random-enchantments"><ul><li>x</li></ul></div>"#;
        assert_eq!(
            class_block(doc, "random-enchantments"),
            Some("<ul><li>x</li></ul>")
        );
        assert_eq!(first_block(doc, "li"), Some("x"));
    }

    #[test]
    fn comment_marker_text() {
        let doc = "<br><!--bo-->Binds when picked up<br>";
        assert_eq!(comment_text(doc, "bo"), Some("Binds when picked up"));
    }

    #[test]
    fn li_blocks_in_order() {
        let doc = "<ul><li>one</li><li>two <b>bold</b></li></ul>";
        let items = blocks(doc, "li");
        assert_eq!(items, vec!["one", "two <b>bold</b>"]);
    }

    #[test]
    fn take_block_removes_and_flattens() {
        let slice = r#"<span>of the Bear</span>+4 Agility<small>5% chance</small>"#;
        let (span, rest) = take_block(slice, "span").unwrap();
        assert_eq!(span, "of the Bear");
        let (small, rest) = take_block(&rest, "small").unwrap();
        assert_eq!(small, "5% chance");
        assert_eq!(rest, "+4 Agility");
    }

    #[test]
    fn strip_tags_decodes_entities() {
        assert_eq!(strip_tags("<b>+5</b>&nbsp;Nature&#39;s"), "+5 Nature's");
    }
}
