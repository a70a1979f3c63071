//! Renderers for the comparison report: console text and a standalone HTML
//! page. The JSON form is just the serialized report itself.

use std::fmt::Write;

use serde_json::Value;

use eagsync_core::{ComparisonReport, MissingVehicle};

/// `45231` -> `"45,231"`.
fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - idx;
        if idx > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

fn price_text(price: Option<i64>) -> String {
    match price {
        Some(p) => format!("${}", group_thousands(p)),
        None => "Call for price".to_string(),
    }
}

/// Human form of a diff value: strings unquoted, null as a dash, everything
/// else in its JSON form.
fn value_text(v: &Value) -> String {
    match v {
        Value::Null => "—".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn title_text(title: Option<&str>) -> &str {
    title.unwrap_or("(untitled)")
}

#[must_use]
pub(crate) fn render_console(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(70);
    let line = "-".repeat(70);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "INVENTORY COMPARISON REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "\nGenerated: {}", report.generated_at);

    let s = &report.summary;
    let _ = writeln!(out, "\nSUMMARY:");
    let _ = writeln!(out, "  Live site: {} vehicles", s.live_total);
    let _ = writeln!(out, "  Content store: {} vehicles", s.stored_total);
    let _ = writeln!(out, "  Missing in store: {} vehicles", s.missing_in_store);
    let _ = writeln!(
        out,
        "  Missing on live: {} vehicles (likely sold)",
        s.missing_on_live
    );
    let _ = writeln!(out, "  Mismatched data: {} vehicles", s.mismatched);

    if !report.missing_in_store.is_empty() {
        let _ = writeln!(out, "\n{line}\nMISSING IN STORE:\n{line}");
        write_missing(&mut out, &report.missing_in_store, true);
    }

    if !report.missing_on_live.is_empty() {
        let _ = writeln!(out, "\n{line}\nMISSING ON LIVE SITE (LIKELY SOLD):\n{line}");
        write_missing(&mut out, &report.missing_on_live, false);
    }

    if !report.mismatched.is_empty() {
        let _ = writeln!(out, "\n{line}\nMISMATCHED DATA:\n{line}");
        for (idx, vehicle) in report.mismatched.iter().enumerate() {
            let _ = writeln!(out, "\n  {}. {}", idx + 1, title_text(vehicle.title.as_deref()));
            let _ = writeln!(out, "     Slug: {}", vehicle.slug);
            for diff in &vehicle.differences {
                let _ = writeln!(out, "     * {}:", diff.field);
                let _ = writeln!(out, "       Live:   {}", value_text(&diff.live));
                let _ = writeln!(out, "       Stored: {}", value_text(&diff.stored));
            }
        }
    }

    let _ = writeln!(out, "\n{rule}");
    out
}

fn write_missing(out: &mut String, vehicles: &[MissingVehicle], with_vin: bool) {
    for (idx, vehicle) in vehicles.iter().enumerate() {
        let _ = writeln!(out, "\n  {}. {}", idx + 1, title_text(vehicle.title.as_deref()));
        let _ = writeln!(out, "     Price: {}", price_text(vehicle.price));
        let _ = writeln!(out, "     Slug: {}", vehicle.slug);
        if with_vin {
            if let Some(vin) = &vehicle.vin {
                let _ = writeln!(out, "     VIN: {vin}");
            }
        }
        if let Some(status) = &vehicle.status {
            let _ = writeln!(out, "     Status: {status}");
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[must_use]
pub(crate) fn render_html(report: &ComparisonReport) -> String {
    let s = &report.summary;
    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Inventory Comparison Report</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
                max-width: 1200px; margin: 0 auto; padding: 20px; background: #f5f5f5; }}
        .header {{ background: #0a0c10; color: white; padding: 30px; border-radius: 8px; margin-bottom: 30px; }}
        .header h1 {{ margin: 0 0 10px 0; }}
        .summary {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
                    gap: 20px; margin-bottom: 30px; }}
        .stat-card {{ background: white; padding: 20px; border-radius: 8px;
                      box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .stat-card h3 {{ margin: 0 0 10px 0; color: #666; font-size: 14px; text-transform: uppercase; }}
        .stat-card .value {{ font-size: 32px; font-weight: bold; color: #0a0c10; }}
        .section {{ background: white; padding: 30px; border-radius: 8px; margin-bottom: 20px;
                    box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .section h2 {{ margin: 0 0 20px 0; color: #0a0c10; border-bottom: 2px solid #F90020;
                       padding-bottom: 10px; }}
        .vehicle {{ padding: 15px; border-left: 3px solid #2E90FA; margin-bottom: 15px; background: #f9f9f9; }}
        .vehicle h3 {{ margin: 0 0 10px 0; color: #0a0c10; }}
        .vehicle-meta {{ color: #666; font-size: 14px; margin-bottom: 5px; }}
        .diff {{ margin: 10px 0; padding: 10px; background: white; border-radius: 4px; }}
        .diff-field {{ font-weight: bold; color: #F90020; }}
        .diff-values {{ display: grid; grid-template-columns: 1fr 1fr; gap: 10px; margin-top: 5px; }}
        .diff-value {{ padding: 5px; border-radius: 4px; font-size: 14px; }}
        .diff-value.live {{ background: #e8f5e9; border-left: 3px solid #4caf50; }}
        .diff-value.stored {{ background: #fff3e0; border-left: 3px solid #ff9800; }}
        .label {{ font-size: 12px; color: #666; text-transform: uppercase; margin-bottom: 3px; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>Inventory Comparison Report</h1>
        <p>Generated: {generated}</p>
    </div>

    <div class="summary">
        <div class="stat-card"><h3>Live Site</h3><div class="value">{live}</div></div>
        <div class="stat-card"><h3>Content Store</h3><div class="value">{stored}</div></div>
        <div class="stat-card"><h3>Missing in Store</h3><div class="value">{missing}</div></div>
        <div class="stat-card"><h3>Mismatched</h3><div class="value">{mismatched}</div></div>
    </div>
"#,
        generated = escape_html(&report.generated_at),
        live = s.live_total,
        stored = s.stored_total,
        missing = s.missing_in_store,
        mismatched = s.mismatched,
    );

    if !report.missing_in_store.is_empty() {
        html.push_str("    <div class=\"section\">\n        <h2>Missing in Store</h2>\n");
        for vehicle in &report.missing_in_store {
            let _ = write!(
                html,
                r#"        <div class="vehicle">
            <h3>{title}</h3>
            <div class="vehicle-meta">Price: {price}</div>
            <div class="vehicle-meta">Slug: {slug}</div>
            <div class="vehicle-meta">Status: {status}</div>
        </div>
"#,
                title = escape_html(title_text(vehicle.title.as_deref())),
                price = escape_html(&price_text(vehicle.price)),
                slug = escape_html(&vehicle.slug),
                status = escape_html(vehicle.status.as_deref().unwrap_or("—")),
            );
        }
        html.push_str("    </div>\n");
    }

    if !report.mismatched.is_empty() {
        html.push_str("    <div class=\"section\">\n        <h2>Mismatched Data</h2>\n");
        for vehicle in &report.mismatched {
            let _ = write!(
                html,
                r#"        <div class="vehicle">
            <h3>{title}</h3>
            <div class="vehicle-meta">Slug: {slug}</div>
"#,
                title = escape_html(title_text(vehicle.title.as_deref())),
                slug = escape_html(&vehicle.slug),
            );
            for diff in &vehicle.differences {
                let _ = write!(
                    html,
                    r#"            <div class="diff">
                <div class="diff-field">{field}</div>
                <div class="diff-values">
                    <div class="diff-value live"><div class="label">Live Site</div>{live}</div>
                    <div class="diff-value stored"><div class="label">Content Store</div>{stored}</div>
                </div>
            </div>
"#,
                    field = escape_html(&diff.field),
                    live = escape_html(&value_text(&diff.live)),
                    stored = escape_html(&value_text(&diff.stored)),
                );
            }
            html.push_str("        </div>\n");
        }
        html.push_str("    </div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
