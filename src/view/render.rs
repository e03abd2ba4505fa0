//! HTML projection of the details panel.
//!
//! Backend text (labels, literals, error messages) is escaped, so it is shown
//! verbatim and never interpreted as markup. Cross-reference links carry
//! their target in `data-ref`; the host routes clicks on `a.uri-link` to
//! [`crate::Navigator::follow_reference`].

use super::{
    DetailsCard, DetailsPanel, RowValue, EMPTY_DETAILS_TEXT, FAILED_DETAILS_TEXT, LOADING_TEXT,
};

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Markup for the details panel.
pub fn render_details(panel: &DetailsPanel) -> String {
    match panel {
        DetailsPanel::Empty => format!(
            r#"<div class="details-empty"><p>{}</p></div>"#,
            EMPTY_DETAILS_TEXT
        ),
        DetailsPanel::Loading { .. } => {
            format!(r#"<div class="details-loading">{}</div>"#, LOADING_TEXT)
        }
        DetailsPanel::Loaded(card) => render_card(card),
        DetailsPanel::ApplicationError { message, .. } => format!(
            r#"<div class="details-error">Error: {}</div>"#,
            escape_html(message)
        ),
        DetailsPanel::Failed { .. } => {
            format!(r#"<div class="details-error">{}</div>"#, FAILED_DETAILS_TEXT)
        }
    }
}

fn render_card(card: &DetailsCard) -> String {
    let rows: String = card
        .rows
        .iter()
        .map(|row| {
            let value = match &row.value {
                RowValue::Reference { target, text } => format!(
                    r##"<a href="#" class="uri-link" data-ref="{target}">{text}</a> <span class="uri-raw">({raw})</span>"##,
                    target = escape_html(target.as_str()),
                    text = escape_html(text),
                    raw = escape_html(target.as_str()),
                ),
                RowValue::Literal(text) => escape_html(text),
            };
            format!(
                r#"<div class="property-row"><div class="property-label">{}</div><div class="property-value">{}</div></div>"#,
                escape_html(&row.label),
                value
            )
        })
        .collect();

    format!(
        r#"<div class="details-card"><div class="details-header"><h2>{title}</h2><a href="{describe}" class="action-btn">Describe Axiom</a></div><div class="details-id">{id}</div><div class="properties">{rows}</div></div>"#,
        title = escape_html(&card.title),
        describe = escape_html(&card.describe_url),
        id = escape_html(card.id.as_str()),
        rows = rows,
    )
}
