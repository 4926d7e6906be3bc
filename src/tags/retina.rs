//! Responsive image tag
//!
//! `{% imgretina src: '/images/photo.png' caption: 'A photo' %}` renders a
//! fixed `<img>` fragment with the `retina` class; the stylesheet scales it
//! to half its pixel dimensions for high-density displays.

use std::collections::HashMap;

/// Tag name recognized by the expander
pub const TAG_NAME: &str = "imgretina";

/// Render the image fragment from parsed attributes
///
/// Missing attributes render as empty strings, matching how the template
/// engine treats absent values.
pub fn render(attributes: &HashMap<String, String>) -> String {
    let src = attributes.get("src").map_or("", String::as_str);
    let caption = attributes.get("caption").map_or("", String::as_str);
    format!("<img class='retina' src='{src}' title='{caption}' />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::attributes::parse_attributes;

    #[test]
    fn test_render() {
        let attrs = parse_attributes("src: '/images/cert.png' caption: 'Certificate details'");
        assert_eq!(
            render(&attrs),
            "<img class='retina' src='/images/cert.png' title='Certificate details' />"
        );
    }

    #[test]
    fn test_render_missing_caption() {
        let attrs = parse_attributes("src: '/images/cert.png'");
        assert_eq!(
            render(&attrs),
            "<img class='retina' src='/images/cert.png' title='' />"
        );
    }

    #[test]
    fn test_render_no_attributes() {
        let attrs = HashMap::new();
        assert_eq!(render(&attrs), "<img class='retina' src='' title='' />");
    }
}
