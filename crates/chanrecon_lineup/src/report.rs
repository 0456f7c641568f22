use crate::lineup::{ChannelRecord, Lineup};

const PLACEHOLDER: &str = "&nbsp;";

/// A reconciled lineup in channel number order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    pub channels: Vec<ChannelRecord>,
}

impl Report {
    pub fn mismatches(&self) -> usize {
        self.channels.iter().filter(|c| c.is_mismatch()).count()
    }

    pub fn missing(&self) -> usize {
        self.channels
            .iter()
            .filter(|c| c.xmltv_selected.flag().is_none())
            .count()
    }
}

impl From<Lineup> for Report {
    fn from(lineup: Lineup) -> Self {
        Self {
            channels: lineup.into_sorted(),
        }
    }
}

/// Renders the channel table.
///
/// Rows where the DVR and the scheduling store disagree are highlighted. A
/// frequency shared with the row above is left blank.
pub fn render_table(channels: &[ChannelRecord]) -> String {
    let mut html = String::from(
        "<table id=\"channel_list\" class=\"sortable\">\n\
         <thead><tr><th>channum</th><th>freqid</th><th>name</th><th>visible</th><th>XMLTV<br />selected</th></tr></thead>\n\
         <tbody>\n",
    );

    let mut prev_freq = "";

    for channel in channels {
        let freq = if channel.freqid == prev_freq {
            PLACEHOLDER.to_string()
        } else {
            prev_freq = channel.freqid.as_str();
            html_escape(&channel.freqid)
        };

        let class = if channel.is_mismatch() {
            " class=\"mismatch\""
        } else {
            ""
        };

        html.push_str(&format!(
            "<tr{class}><td>{number}</td><td>{freq}</td><td>{name}</td><td class=\"flag\">{visible}</td><td class=\"flag\">{selected}</td></tr>\n",
            number = channel.number,
            name = html_escape(channel.display_name()),
            visible = html_escape(&channel.visible_text),
            selected = channel.xmltv_selected,
        ));
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Renders the complete report page.
pub fn render_document(report: &Report, generated_at: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Channel Reconciliation</title>
    <style>{css}</style>
</head>
<body>
<h1>Channel Reconciliation</h1>
<p class="summary">{total} channels, {mismatches} mismatched, {missing} missing from XMLTV. Generated {generated_at}.</p>
{table}<script>{js}</script>
</body>
</html>
"#,
        css = inline_css(),
        js = inline_javascript(),
        total = report.channels.len(),
        mismatches = report.mismatches(),
        missing = report.missing(),
        generated_at = html_escape(generated_at),
        table = render_table(&report.channels),
    )
}

/// Renders the page shown instead of the report when reconciliation fails.
pub fn render_failure(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Channel Reconciliation Failed</title>
    <style>{css}</style>
</head>
<body>
<h1>Channel Reconciliation Failed</h1>
<p class="failure">The channel lineup could not be reconciled. No report was produced.</p>
<pre>{message}</pre>
</body>
</html>
"#,
        css = inline_css(),
        message = html_escape(message),
    )
}

fn inline_css() -> &'static str {
    r#"
body { font-family: system-ui, sans-serif; margin: 1.5rem; }
table { border-collapse: collapse; }
th, td { padding: 0.15rem 0.6rem; border-bottom: 1px solid #ddd; }
th { cursor: pointer; text-align: left; }
td.flag { text-align: center; }
tr.mismatch { background-color: #eee8e0; }
.failure { color: #a00; font-weight: bold; }
"#
}

fn inline_javascript() -> &'static str {
    r#"
document.querySelectorAll('table.sortable th').forEach(function (th, column) {
    th.addEventListener('click', function () {
        var tbody = th.closest('table').tBodies[0];
        var ascending = th.dataset.order !== 'asc';
        th.dataset.order = ascending ? 'asc' : 'desc';
        var rows = Array.from(tbody.rows);
        rows.sort(function (a, b) {
            var x = a.cells[column].textContent.trim();
            var y = b.cells[column].textContent.trim();
            var order = x.localeCompare(y, undefined, { numeric: true });
            return ascending ? order : -order;
        });
        rows.forEach(function (row) { tbody.appendChild(row); });
    });
});
"#
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
