//! Markup writer used by `serialize` implementations.
//!
//! Output shape is fixed: `<tag id='..' title='..' class='..' style='..' extra..>`
//! followed by children and `</tag>`, or `<tag .../>` for void kinds. Attributes
//! with no value are skipped entirely.

/// Incremental builder for a single element's markup.
#[derive(Debug)]
pub struct Markup {
    buf: String,
    escape: bool,
}

impl Markup {
    /// Start an opening tag.
    pub fn open(tag: &str, escape: bool) -> Self {
        let mut buf = String::with_capacity(64);
        buf.push('<');
        buf.push_str(tag);
        Self { buf, escape }
    }

    /// Append ` name='value'`.
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(name);
        self.buf.push_str("='");
        if self.escape {
            escape_into(&mut self.buf, value);
        } else {
            self.buf.push_str(value);
        }
        self.buf.push('\'');
        self
    }

    /// Append the attribute only when a value is present.
    pub fn attr_opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.attr(name, value);
        }
        self
    }

    /// Finish a void element: `<tag .../>`.
    pub fn finish_void(mut self) -> String {
        self.buf.push_str("/>");
        self.buf
    }

    /// Finish with children markup and the closing tag.
    pub fn finish(mut self, tag: &str, children: &str) -> String {
        self.buf.reserve(children.len() + tag.len() + 4);
        self.buf.push('>');
        self.buf.push_str(children);
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self.buf
    }
}

/// Escape a value for use inside a single-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    escape_into(&mut out, value);
    out
}

fn escape_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_markup() {
        let mut markup = Markup::open("div", true);
        markup.attr("id", "panel1").attr_opt("title", None).attr_opt("class", Some("wide"));
        assert_eq!(
            markup.finish("div", "hello"),
            "<div id='panel1' class='wide'>hello</div>"
        );
    }

    #[test]
    fn test_void_markup() {
        let mut markup = Markup::open("input", true);
        markup.attr("id", "inp1").attr("type", "text");
        assert_eq!(markup.finish_void(), "<input id='inp1' type='text'/>");
    }

    #[test]
    fn test_escaping() {
        let mut markup = Markup::open("a", true);
        markup.attr("title", "Tom's <b> & co");
        assert_eq!(
            markup.finish("a", ""),
            "<a title='Tom&#39;s &lt;b> &amp; co'></a>"
        );
        assert_eq!(escape_attribute("it's"), "it&#39;s");
    }

    #[test]
    fn test_escaping_disabled() {
        let mut markup = Markup::open("a", false);
        markup.attr("title", "a&b");
        assert_eq!(markup.finish("a", ""), "<a title='a&b'></a>");
    }
}
