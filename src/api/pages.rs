use crate::domain::model::{DisplayRow, ItemId};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <link rel="stylesheet" href="/styles.css">
  </head>
  <body>
    <nav><a href="/home">Home</a> | <a href="/status">Status</a> | <a href="/current-tags">Current tags</a></nav>
{body}
  </body>
</html>
"#,
        title = escape_html(title),
        body = body
    )
}

pub fn home_page() -> String {
    let body = r#"    <h1>Pixel Relay</h1>
    <p>Embed the tracking pixel in a listing description to record views:</p>
    <pre>&lt;img src="/track?item_id=YOUR_ITEM_ID" width="1" height="1" alt=""&gt;</pre>
    <p>Tracked items and their live details are listed under <a href="/current-tags">Current tags</a>.</p>"#;
    layout("Pixel Relay", body)
}

pub fn status_page(items: &[ItemId], started_at: DateTime<Utc>) -> String {
    let mut body = String::from("    <h1>Tracking Server is Running!</h1>\n");
    let _ = writeln!(
        body,
        "    <p>Up since {}. Tracking {} item IDs:</p>",
        started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        items.len()
    );
    body.push_str("    <ul>\n");
    for id in items {
        let _ = writeln!(body, "      <li>{}</li>", escape_html(id.as_str()));
    }
    body.push_str("    </ul>");
    layout("Tracking Server Status", &body)
}

pub fn listing_page(rows: &[DisplayRow]) -> String {
    let mut body = String::from("    <h1>Current Tags</h1>\n");
    if rows.is_empty() {
        body.push_str("    <p>No items tracked yet.</p>");
        return layout("Current Tags", &body);
    }

    body.push_str("    <ul class=\"tags\">\n");
    for row in rows {
        match row {
            DisplayRow::Enriched { id, details } => {
                let _ = writeln!(
                    body,
                    r#"      <li class="tag"><a href="{url}"><img src="{thumb}" alt="{title}" width="96"></a> <a href="{url}">{title}</a> <small>{id}</small></li>"#,
                    url = escape_html(&details.source_url),
                    thumb = escape_html(&details.thumbnail_url),
                    title = escape_html(&details.title),
                    id = escape_html(id.as_str()),
                );
            }
            DisplayRow::Unavailable { id } => {
                let _ = writeln!(
                    body,
                    r#"      <li class="tag unavailable">{} <em>(details not available)</em></li>"#,
                    escape_html(id.as_str())
                );
            }
        }
    }
    body.push_str("    </ul>");
    layout("Current Tags", &body)
}
