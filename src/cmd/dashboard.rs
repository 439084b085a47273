//! HTML dashboard generation
//!
//! Generates a self-contained HTML file with embedded CSS/JS: summary cards,
//! the three compliance charts and the assessed table, with unit and category
//! filters applied client-side.

use super::DatasetArgs;
use crate::core::{
    filter, AssessedRecord, Assessment, Classification, ComplianceConfig, DEFAULT_TOP_TAXPAYERS,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DashboardCommand {
    #[command(flatten)]
    dataset: DatasetArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DashboardCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let (config, assessment) = self.dataset.assess()?;
        let records = filter::apply(&assessment, &config);
        let html = generate(&assessment, &config, &records)?;

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("Dashboard written to: {}", output_path.display());
        } else {
            let temp_path = std::env::temp_dir().join("taxcomp-dashboard.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened dashboard in browser: {}", temp_path.display());
        }

        Ok(())
    }
}

/// Data structure for embedding in HTML as JSON
#[derive(Serialize)]
pub struct DashboardData {
    pub sheet: String,
    pub tax_year: i32,
    pub policy: String,
    pub classifications: Vec<&'static str>,
    pub months: Vec<String>,
    pub units: Vec<String>,
    pub categories: Vec<String>,
    pub top: usize,
    pub rows: Vec<DashboardRow>,
}

#[derive(Serialize)]
pub struct DashboardRow {
    pub unit: String,
    pub category: String,
    pub name: String,
    pub tmt: String,
    pub total: String,
    pub active: u32,
    pub paid: u32,
    pub average: String,
    pub percent: String,
    pub classification: &'static str,
    /// Amount per entry of `months`
    pub payments: Vec<String>,
}

fn build_data(
    assessment: &Assessment,
    config: &ComplianceConfig,
    records: &[&AssessedRecord],
) -> DashboardData {
    let layout = &assessment.layout;
    let unit = layout.column_index(&config.columns.unit);
    let category = layout.column_index(&config.columns.category);
    let name = layout.column_index(&config.columns.taxpayer);
    let cell = |record: &AssessedRecord, index: Option<usize>| {
        index
            .map(|i| record.record.cell(i).to_string())
            .unwrap_or_default()
    };

    let rows = records
        .iter()
        .map(|&r| DashboardRow {
            unit: cell(r, unit),
            category: cell(r, category),
            name: cell(r, name),
            tmt: r.record.cell(layout.registration).to_string(),
            total: r.result.total_payment.normalize().to_string(),
            active: r.result.active_months,
            paid: r.result.paid_months,
            average: r.result.average_payment.round_dp(2).to_string(),
            percent: r.result.compliance_percent.round_dp(2).to_string(),
            classification: r.result.classification.label(),
            payments: r
                .record
                .payments
                .iter()
                .map(|p| p.amount.normalize().to_string())
                .collect(),
        })
        .collect();

    DashboardData {
        sheet: assessment.sheet_name.clone(),
        tax_year: assessment.tax_year,
        policy: format!("{:?}", assessment.policy),
        classifications: Classification::ALL.iter().map(|c| c.label()).collect(),
        months: layout
            .payments
            .iter()
            .map(|p| p.month.format("%Y-%m-%d").to_string())
            .collect(),
        units: filter::distinct_values(assessment, &config.columns.unit),
        categories: filter::distinct_values(assessment, &config.columns.category),
        top: DEFAULT_TOP_TAXPAYERS,
        rows,
    }
}

/// Generate dashboard HTML content
pub fn generate(
    assessment: &Assessment,
    config: &ComplianceConfig,
    records: &[&AssessedRecord],
) -> anyhow::Result<String> {
    let data = build_data(assessment, config, records);
    // keep cell text from closing the script element
    let json_data = serde_json::to_string(&data)?.replace("</", "<\\/");

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tax Compliance Dashboard</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Tax Compliance Dashboard</h1>
        <p class="subtitle" id="subtitle"></p>
        <div class="filter-row">
            <div class="filter-group">
                <label for="unit">Unit</label>
                <select id="unit" onchange="render()"><option value="">All</option></select>
            </div>
            <div class="filter-group">
                <label for="category">Category</label>
                <select id="category" onchange="render()"><option value="">All</option></select>
            </div>
        </div>
    </header>

    <main>
        <section class="summary-cards">
            <div class="card"><h3>Taxpayers</h3><p class="value" id="card-count">-</p></div>
            <div class="card"><h3>Total Payment</h3><p class="value" id="card-total">-</p></div>
            <div class="card"><h3>Full Compliance</h3><p class="value" id="card-full">-</p></div>
        </section>

        <section class="charts">
            <div class="chart"><h2>Compliance Distribution</h2><div id="chart-distribution"></div></div>
            <div class="chart"><h2>Payments per Month</h2><div id="chart-monthly"></div></div>
            <div class="chart"><h2>Top Taxpayers by Total Payment</h2><div id="chart-top"></div></div>
        </section>

        <section class="data-section">
            <h2>Taxpayers <span class="count" id="rows-count"></span></h2>
            <div class="table-container">
                <table>
                    <thead>
                        <tr>
                            <th>Unit</th><th>Category</th><th>Taxpayer</th><th>TMT</th>
                            <th>Total Payment</th><th>Active</th><th>Paid</th>
                            <th>Average</th><th>Compliance</th><th>Classification</th>
                        </tr>
                    </thead>
                    <tbody id="rows-body"></tbody>
                </table>
            </div>
        </section>
    </main>

    <script>
const DATA = {json_data};

function init() {{
    document.getElementById('subtitle').textContent =
        DATA.sheet + ' · tax year ' + DATA.tax_year + ' · ' + DATA.policy + ' policy';
    fillSelect('unit', DATA.units);
    fillSelect('category', DATA.categories);
    render();
}}

function fillSelect(id, values) {{
    const select = document.getElementById(id);
    values.forEach(v => {{
        const opt = document.createElement('option');
        opt.value = v;
        opt.textContent = v;
        select.appendChild(opt);
    }});
}}

function selectedRows() {{
    const unit = document.getElementById('unit').value;
    const category = document.getElementById('category').value;
    return DATA.rows.filter(r =>
        (!unit || r.unit === unit) && (!category || r.category === category));
}}

function formatAmount(value) {{
    return Number(value).toLocaleString(undefined, {{ minimumFractionDigits: 2, maximumFractionDigits: 2 }});
}}

function escapeHtml(text) {{
    const div = document.createElement('div');
    div.textContent = text;
    return div.innerHTML;
}}

function bars(id, items) {{
    const max = Math.max(1, ...items.map(i => i.value));
    document.getElementById(id).innerHTML = items.map(i =>
        '<div class="bar-row"><span class="bar-label">' + escapeHtml(i.label) + '</span>' +
        '<span class="bar"><span class="bar-fill ' + (i.cls || '') + '" style="width:' +
        (i.value / max * 100).toFixed(1) + '%"></span></span>' +
        '<span class="bar-value">' + i.text + '</span></div>').join('') ||
        '<p class="empty">No data</p>';
}}

function classCss(label) {{
    return 'c' + DATA.classifications.indexOf(label);
}}

function render() {{
    const rows = selectedRows();
    const total = rows.reduce((s, r) => s + parseFloat(r.total), 0);
    const full = rows.filter(r => r.classification === DATA.classifications[2]).length;

    document.getElementById('card-count').textContent = rows.length;
    document.getElementById('card-total').textContent = formatAmount(total);
    document.getElementById('card-full').textContent = full;
    document.getElementById('rows-count').textContent = '(' + rows.length + ')';

    bars('chart-distribution', DATA.classifications.map(c => {{
        const n = rows.filter(r => r.classification === c).length;
        const share = rows.length ? (n / rows.length * 100).toFixed(1) : '0.0';
        return {{ label: c, value: n, text: n + ' (' + share + '%)', cls: classCss(c) }};
    }}));

    const monthly = {{}};
    DATA.months.forEach((m, i) => {{
        monthly[m] = (monthly[m] || 0) + rows.reduce((s, r) => s + parseFloat(r.payments[i]), 0);
    }});
    bars('chart-monthly', Object.keys(monthly).sort().map(m =>
        ({{ label: m.slice(0, 7), value: monthly[m], text: formatAmount(monthly[m]) }})));

    const byName = {{}};
    rows.filter(r => r.name).forEach(r => {{
        byName[r.name] = (byName[r.name] || 0) + parseFloat(r.total);
    }});
    bars('chart-top', Object.entries(byName)
        .sort((a, b) => b[1] - a[1] || a[0].localeCompare(b[0]))
        .slice(0, DATA.top)
        .map(([name, value]) => ({{ label: name, value: value, text: formatAmount(value) }})));

    document.getElementById('rows-body').innerHTML = rows.map(r =>
        '<tr><td>' + escapeHtml(r.unit) + '</td><td>' + escapeHtml(r.category) + '</td>' +
        '<td>' + escapeHtml(r.name) + '</td><td>' + escapeHtml(r.tmt) + '</td>' +
        '<td class="num">' + formatAmount(r.total) + '</td><td class="num">' + r.active + '</td>' +
        '<td class="num">' + r.paid + '</td><td class="num">' + formatAmount(r.average) + '</td>' +
        '<td class="num">' + r.percent + '%</td>' +
        '<td><span class="badge ' + classCss(r.classification) + '">' + r.classification + '</span></td></tr>'
    ).join('');
}}

init();
    </script>
</body>
</html>
"##,
        css = CSS,
        json_data = json_data,
    ))
}

const CSS: &str = r#"
:root {
    --gray-50: #f9fafb;
    --gray-200: #e5e7eb;
    --gray-500: #6b7280;
    --gray-900: #111827;
    --low: #dc2626;
    --low-bg: #fee2e2;
    --moderate: #d97706;
    --moderate-bg: #fef3c7;
    --full: #16a34a;
    --full-bg: #dcfce7;
    --bar: #60a5fa;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif;
    background: var(--gray-50);
    color: var(--gray-900);
    line-height: 1.5;
}

header {
    background: white;
    border-bottom: 1px solid var(--gray-200);
    padding: 1.5rem 2rem;
}

header h1 { font-size: 1.5rem; font-weight: 600; }
.subtitle { color: var(--gray-500); margin-bottom: 1rem; }
.filter-row { display: flex; gap: 1.5rem; }
.filter-group { display: flex; flex-direction: column; gap: 0.25rem; }
.filter-group label { font-size: 0.75rem; color: var(--gray-500); text-transform: uppercase; }
select { padding: 0.4rem; border: 1px solid var(--gray-200); border-radius: 4px; min-width: 12rem; }

main { padding: 2rem; display: flex; flex-direction: column; gap: 2rem; }

.summary-cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
.card { background: white; border: 1px solid var(--gray-200); border-radius: 8px; padding: 1rem; }
.card h3 { font-size: 0.8rem; color: var(--gray-500); font-weight: 500; }
.card .value { font-size: 1.5rem; font-weight: 600; }

.charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 1rem; }
.chart { background: white; border: 1px solid var(--gray-200); border-radius: 8px; padding: 1rem; }
.chart h2, .data-section h2 { font-size: 1rem; margin-bottom: 0.75rem; }
.bar-row { display: grid; grid-template-columns: 9rem 1fr 8rem; gap: 0.5rem; align-items: center; font-size: 0.85rem; }
.bar-label { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.bar { background: var(--gray-50); height: 0.9rem; border-radius: 3px; }
.bar-fill { display: block; height: 100%; background: var(--bar); border-radius: 3px; }
.bar-fill.c0 { background: var(--low); }
.bar-fill.c1 { background: var(--moderate); }
.bar-fill.c2 { background: var(--full); }
.bar-value { text-align: right; font-variant-numeric: tabular-nums; }
.empty { color: var(--gray-500); }

.table-container { overflow-x: auto; background: white; border: 1px solid var(--gray-200); border-radius: 8px; }
table { width: 100%; border-collapse: collapse; font-size: 0.85rem; }
th, td { padding: 0.5rem 0.75rem; border-bottom: 1px solid var(--gray-200); text-align: left; white-space: nowrap; }
th { background: var(--gray-50); font-weight: 600; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.count { color: var(--gray-500); font-weight: 400; }

.badge { padding: 0.1rem 0.5rem; border-radius: 999px; font-size: 0.75rem; }
.badge.c0 { color: var(--low); background: var(--low-bg); }
.badge.c1 { color: var(--moderate); background: var(--moderate-bg); }
.badge.c2 { color: var(--full); background: var(--full-bg); }
"#;
