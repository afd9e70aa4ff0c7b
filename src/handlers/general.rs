use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler — returns an HTML landing page with project info and links
pub async fn root_handler() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Somity Payroll API</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; min-height: 100vh; padding: 40px 20px; }
    .container { max-width: 760px; margin: 0 auto; }
    header { text-align: center; margin-bottom: 40px; }
    header h1 { font-size: 2.4rem; font-weight: 800; background: linear-gradient(135deg, #22c55e, #3b82f6); -webkit-background-clip: text; -webkit-text-fill-color: transparent; margin-bottom: 8px; }
    header p { color: #94a3b8; font-size: 1.05rem; }
    .routes { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 24px; }
    .routes h2 { font-size: 1.1rem; font-weight: 700; color: #f1f5f9; margin-bottom: 16px; }
    .group { margin-bottom: 18px; }
    .group h4 { font-size: 0.8rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.1em; color: #64748b; margin-bottom: 8px; }
    .item { display: flex; gap: 12px; padding: 7px 0; border-bottom: 1px solid #0f172a; }
    .item:last-child { border-bottom: none; }
    .method { font-size: 0.7rem; font-weight: 700; padding: 2px 8px; border-radius: 4px; min-width: 52px; text-align: center; font-family: monospace; }
    .get { background: #064e3b; color: #34d399; }
    .post { background: #1e3a5f; color: #60a5fa; }
    .put, .patch { background: #451a03; color: #fb923c; }
    .delete { background: #4c0519; color: #fb7185; }
    .path { font-family: monospace; font-size: 0.85rem; color: #e2e8f0; flex: 1; }
    .desc { font-size: 0.8rem; color: #64748b; }
    footer { text-align: center; margin-top: 32px; color: #475569; font-size: 0.85rem; }
    a { color: #38bdf8; }
  </style>
</head>
<body>
<div class="container">
  <header>
    <h1>Somity Payroll API</h1>
    <p>Salary sheets for a multi-branch microfinance operation — commissions, bonuses and deductions recomputed from the collection ledger on every read.</p>
    <p style="margin-top:10px"><a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>
  </header>

  <div class="routes">
    <h2>API Routes</h2>

    <div class="group">
      <h4>Master Data</h4>
      <div class="item"><span class="method post">POST</span><span class="path">/api/v1/branches</span><span class="desc">Create a branch</span></div>
      <div class="item"><span class="method get">GET</span><span class="path">/api/v1/branches</span><span class="desc">List branches</span></div>
      <div class="item"><span class="method post">POST</span><span class="path">/api/v1/employees</span><span class="desc">Create an employee</span></div>
      <div class="item"><span class="method get">GET</span><span class="path">/api/v1/employees</span><span class="desc">List employees</span></div>
      <div class="item"><span class="method patch">PATCH</span><span class="path">/api/v1/employees/:id</span><span class="desc">Update base salary / commission tier</span></div>
    </div>

    <div class="group">
      <h4>Collection Ledger</h4>
      <div class="item"><span class="method post">POST</span><span class="path">/api/v1/collections</span><span class="desc">Record a center collection</span></div>
      <div class="item"><span class="method get">GET</span><span class="path">/api/v1/collections</span><span class="desc">List ledger records</span></div>
      <div class="item"><span class="method put">PUT</span><span class="path">/api/v1/collections/:id</span><span class="desc">Edit a record (grid re-aggregates on read)</span></div>
      <div class="item"><span class="method delete">DELETE</span><span class="path">/api/v1/collections/:id</span><span class="desc">Delete a record</span></div>
      <div class="item"><span class="method get">GET</span><span class="path">/api/v1/employees/:id/aggregate</span><span class="desc">Per-employee ledger aggregate</span></div>
    </div>

    <div class="group">
      <h4>Configuration</h4>
      <div class="item"><span class="method get">GET</span><span class="path">/api/v1/commission-rates</span><span class="desc">Commission rate table</span></div>
      <div class="item"><span class="method put">PUT</span><span class="path">/api/v1/commission-rates/:tier</span><span class="desc">Create or update a tier</span></div>
      <div class="item"><span class="method put">PUT</span><span class="path">/api/v1/policies/deductions</span><span class="desc">Late / absence deduction rates</span></div>
      <div class="item"><span class="method put">PUT</span><span class="path">/api/v1/policies/bonus</span><span class="desc">Account-opening bonus schedule</span></div>
    </div>

    <div class="group">
      <h4>Salary Sheets</h4>
      <div class="item"><span class="method post">POST</span><span class="path">/api/v1/sheets/generate</span><span class="desc">Generate the monthly sheet</span></div>
      <div class="item"><span class="method get">GET</span><span class="path">/api/v1/sheets/current/rows</span><span class="desc">Grid rows — always freshly recalculated</span></div>
      <div class="item"><span class="method patch">PATCH</span><span class="path">/api/v1/entries/:id</span><span class="desc">Edit a row's inputs</span></div>
    </div>
  </div>

  <footer>
    <p>Built with 🦀 Rust · Axum</p>
  </footer>
</div>
</body>
</html>"#,
    )
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(json!({
        "status": "healthy",
        "service": "somity-payroll",
        "version": "1.0.0",
        "branches": store.branches.len(),
        "employees": store.employees.len(),
        "ledger_records": store.ledger.len(),
        "sheet_generated": store.sheet.is_some(),
    }))
}
