// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static documents served by the service.

/// RAML description of the HTTP interface.
pub const RAML: &str = include_str!("../assets/interface.raml");

const FORM_HTML: &str = include_str!("../assets/form.html");
const FORM_PLACEHOLDER: &str = "{{DVID_SERVER}}";

/// Front-page form with the DVID server field pre-filled.
pub fn form_html(default_server: &str) -> String {
    FORM_HTML.replacen(FORM_PLACEHOLDER, &escape_attr(default_server), 1)
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raml_lists_every_endpoint() {
        assert!(RAML.starts_with("#%RAML 0.8"));
        for path in ["/overlap:", "/bodystats:", "/interface/interface.raml:"] {
            assert!(RAML.contains(path), "missing {path}");
        }
    }

    #[test]
    fn form_fills_default_server_once_and_escapes() {
        let html = form_html("emdata1:80");
        assert!(html.contains(r#"value="emdata1:80""#));
        assert!(!html.contains(FORM_PLACEHOLDER));

        let html = form_html(r#"a"><script>"#);
        assert!(html.contains("a&quot;&gt;&lt;script&gt;"));
    }
}
