//! HTML markup for individual report entries.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::profile::NOT_AVAILABLE;
use crate::domain::report::ReportEntry;

/// Escapes `value` for a single-quoted JS string literal.
fn js_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn text_or_na(value: Option<&str>) -> String {
    encode_text(value.unwrap_or(NOT_AVAILABLE)).into_owned()
}

/// One `stock-item` block; missing profile fields render as `N/A`.
pub fn render_entry(entry: &ReportEntry) -> String {
    let profile = &entry.profile;
    let company = text_or_na(profile.company_name());
    let ticker = encode_text(&entry.ticker);
    let exchange = encode_text(&entry.exchange);
    let href = encode_double_quoted_attribute(profile.website().unwrap_or("#")).into_owned();
    let data_url = entry.chart.data_url();
    let onclick_arg = encode_double_quoted_attribute(&js_string(&data_url)).into_owned();

    format!(
        r#"        <div class="stock-item">
            <h2>{company} ({ticker}) - {exchange}</h2>
            <p><strong>Company:</strong> {company}</p>
            <p><strong>Sector:</strong> {sector}</p>
            <p><strong>Current Price:</strong> ${price}</p>
            <p><strong>IPO Date:</strong> {ipo}</p>
            <p><strong>Website:</strong> <a href="{href}" target="_blank">{website}</a></p>
            <p><strong>Description:</strong> {description}</p>
            <img src="{src}" alt="{alt} Stock Price" onclick="openGraph('{onclick_arg}')">
        </div>
"#,
        sector = text_or_na(profile.sector()),
        price = entry.price,
        ipo = text_or_na(profile.ipo_date()),
        website = text_or_na(profile.website()),
        description = text_or_na(profile.description()),
        src = encode_double_quoted_attribute(&data_url),
        alt = encode_double_quoted_attribute(&entry.ticker),
    )
}

pub fn render_entries(entries: &[ReportEntry]) -> String {
    entries.iter().map(render_entry).collect()
}
