//! Accounting exports - order reports and receipt documents.
//!
//! Produces the data side of the admin panel's export buttons: a spreadsheet
//! (CSV) or JSON report with one row per order and a formatted currency
//! column, and an itemized plain-text receipt per order. Rendering CSV into a
//! spreadsheet application or a receipt into PDF happens outside this crate.

use crate::core::currency::format_amount;
use crate::entities::order::{self, OrderStatus};
use crate::errors::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values, one row per order
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl ExportFormat {
    /// Parses a format name, defaulting to JSON for anything unrecognized.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "csv" => Self::Csv,
            _ => Self::Json,
        }
    }

    /// File extension for the format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// One order flattened for export.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReportRow {
    /// Shortened order id
    pub id: String,
    /// Creation date (YYYY-MM-DD)
    pub date: String,
    /// Customer name
    pub customer: String,
    /// Customer phone
    pub phone: String,
    /// Customer email or `-`
    pub email: String,
    /// Payment reference or `-`
    pub payment_ref: String,
    /// Payment rail, uppercased
    pub method: String,
    /// Order kind, uppercased
    pub kind: String,
    /// Item names joined with `, `
    pub items: String,
    /// Total with currency formatting
    pub amount: String,
    /// Lifecycle status, uppercased
    pub status: String,
    /// Access code or `-`
    pub code: String,
}

fn dash_if_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Flattens orders into report rows, preserving input order.
#[must_use]
pub fn report_rows(orders: &[order::Model]) -> Vec<OrderReportRow> {
    orders
        .iter()
        .map(|o| OrderReportRow {
            id: o.id.chars().take(8).collect(),
            date: o.created_at.format("%Y-%m-%d").to_string(),
            customer: o.name.clone(),
            phone: o.phone.clone(),
            email: dash_if_empty(&o.email),
            payment_ref: dash_if_empty(&o.payment_ref),
            method: o.method.as_str().to_uppercase(),
            kind: o.kind.as_str().to_uppercase(),
            items: o
                .items
                .0
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            amount: format_amount(o.amount),
            status: o.status.to_string().to_uppercase(),
            code: o.code.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

/// Total amount across approved orders.
#[must_use]
pub fn approved_revenue(orders: &[order::Model]) -> i64 {
    orders
        .iter()
        .filter(|o| o.status == OrderStatus::Approved)
        .map(|o| o.amount)
        .sum()
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Serializes report rows to CSV with a header line.
#[must_use]
pub fn to_csv(rows: &[OrderReportRow]) -> String {
    let mut csv = String::new();
    csv.push_str("id,date,customer,phone,email,payment_ref,method,kind,items,amount,status,code\n");
    for row in rows {
        let fields = [
            &row.id,
            &row.date,
            &row.customer,
            &row.phone,
            &row.email,
            &row.payment_ref,
            &row.method,
            &row.kind,
            &row.items,
            &row.amount,
            &row.status,
            &row.code,
        ];
        let line = fields
            .iter()
            .map(|f| csv_field(f))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

/// Serializes report rows to pretty-printed JSON.
pub fn to_json(rows: &[OrderReportRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).map_err(Into::into)
}

/// One line of a receipt.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptLine {
    /// Item name
    pub name: String,
    /// Formatted unit price
    pub amount: String,
}

/// Itemized receipt for a single order; the PDF rasterizer consumes this.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Shortened order id
    pub order_id: String,
    /// Creation date (YYYY-MM-DD)
    pub date: String,
    /// Customer name
    pub customer: String,
    /// Customer phone
    pub phone: String,
    /// Itemized lines
    pub lines: Vec<ReceiptLine>,
    /// Formatted order total
    pub total: String,
    /// Lifecycle status, uppercased
    pub status: String,
    /// Access code, if issued
    pub code: Option<String>,
}

/// Builds the receipt for one order.
#[must_use]
pub fn receipt_for(order: &order::Model) -> Receipt {
    Receipt {
        order_id: order.id.chars().take(8).collect(),
        date: order.created_at.format("%Y-%m-%d").to_string(),
        customer: order.name.clone(),
        phone: order.phone.clone(),
        lines: order
            .items
            .0
            .iter()
            .map(|i| ReceiptLine {
                name: i.name.clone(),
                amount: format_amount(i.unit_price),
            })
            .collect(),
        total: format_amount(order.amount),
        status: order.status.to_string().to_uppercase(),
        code: order.code.clone(),
    }
}

/// Renders a receipt as plain text lines.
#[must_use]
pub fn render_receipt(receipt: &Receipt) -> String {
    let mut out = String::new();
    out.push_str("ORDER RECEIPT\n");
    out.push_str(&format!("No {}  -  {}\n", receipt.order_id, receipt.date));
    out.push_str(&format!("Customer: {}\n", receipt.customer));
    out.push_str(&format!("Phone: {}\n", receipt.phone));
    out.push_str("--------------------------------\n");
    for line in &receipt.lines {
        out.push_str(&format!("{}  {}\n", line.name, line.amount));
    }
    out.push_str("--------------------------------\n");
    out.push_str(&format!("TOTAL: {}\n", receipt.total));
    out.push_str(&format!("Status: {}\n", receipt.status));
    if let Some(code) = &receipt.code {
        out.push_str(&format!("Access code: {code}\n"));
    }
    out
}

/// Writes an export document into `dir` with a timestamped filename and
/// returns the full path.
pub fn write_report(
    dir: &Path,
    stem: &str,
    format: ExportFormat,
    content: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let filename = format!(
        "{stem}_{}.{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        format.extension()
    );
    let path = dir.join(filename);
    let mut file = fs::File::create(&path)?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}

/// Flattens, serializes and writes a full order report in one call.
pub fn export_orders(
    dir: &Path,
    orders: &[order::Model],
    format: ExportFormat,
) -> Result<PathBuf> {
    let rows = report_rows(orders);
    let content = match format {
        ExportFormat::Csv => to_csv(&rows),
        ExportFormat::Json => to_json(&rows)?,
    };
    write_report(dir, "orders", format, &content)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::order::OrderStatus;
    use crate::test_utils::test_order;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!(ExportFormat::from_str("csv"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str("CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str("json"), ExportFormat::Json);
        assert_eq!(ExportFormat::from_str("unknown"), ExportFormat::Json);
    }

    #[test]
    fn test_report_rows_flatten_orders() {
        let mut order = test_order();
        order.email = String::new();
        order.amount = 15000;

        let rows = report_rows(&[order.clone()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "-");
        assert_eq!(rows[0].amount, "15 000 F");
        assert_eq!(rows[0].status, "PENDING");
        assert_eq!(rows[0].id.len(), 8);
    }

    #[test]
    fn test_csv_has_header_and_one_line_per_order() {
        let rows = report_rows(&[test_order(), test_order()]);
        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,date,customer"));
    }

    #[test]
    fn test_csv_quotes_fields_with_commas() {
        let mut order = test_order();
        order.items.0[0].name = "Report, extended edition".to_string();

        let csv = to_csv(&report_rows(&[order]));
        assert!(csv.contains("\"Report, extended edition\""));
    }

    #[test]
    fn test_approved_revenue_counts_only_approved() {
        let mut approved = test_order();
        approved.status = OrderStatus::Approved;
        approved.amount = 10000;

        let mut rejected = test_order();
        rejected.status = OrderStatus::Rejected;
        rejected.amount = 7000;

        let pending = test_order();

        assert_eq!(approved_revenue(&[approved, rejected, pending]), 10000);
    }

    #[test]
    fn test_receipt_itemizes_and_totals() {
        let mut order = test_order();
        order.status = OrderStatus::Approved;
        order.code = Some("OD-ABCDEFGH".to_string());

        let receipt = receipt_for(&order);
        assert_eq!(receipt.lines.len(), order.items.0.len());

        let text = render_receipt(&receipt);
        assert!(text.contains("ORDER RECEIPT"));
        assert!(text.contains(&receipt.total));
        assert!(text.contains("OD-ABCDEFGH"));
    }

    #[test]
    fn test_export_orders_writes_timestamped_file() {
        let dir = std::env::temp_dir()
            .join("orderdesk-tests")
            .join(uuid::Uuid::new_v4().to_string());

        let path = export_orders(&dir, &[test_order()], ExportFormat::Csv).unwrap();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
