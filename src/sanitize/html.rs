/// Allow-list HTML sanitization for message bodies.
///
/// Formatting and structural markup (headings, paragraphs, emphasis, lists, links,
/// images, tables) is kept as written. Scripts, styles, iframes, forms, event-handler
/// attributes and `javascript:` URLs are removed.
pub fn sanitize_html(input: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder
        .link_rel(None)
        .add_generic_attributes(&["class", "align", "dir"])
        .add_tag_attributes(
            "table",
            &["border", "cellpadding", "cellspacing", "width", "summary"],
        )
        .add_tag_attributes("td", &["width", "valign"])
        .add_tag_attributes("th", &["width", "valign", "scope"]);

    builder.clean(input).to_string()
}
