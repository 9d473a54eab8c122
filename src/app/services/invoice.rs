use std::fmt::Write;

use chrono::{Local, NaiveDate};

use crate::app::infrastructure::error::{AppError, Result};

/// Sample input shown in a fresh invoice form.
pub const SAMPLE_ITEMS: &str = "Item 1,2,10.50\nItem 2,1,25.00";

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    pub name: String,
    pub quantity: u64,
    pub unit_price: f64,
}

impl InvoiceItem {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

pub fn invoice_title(client_name: &str) -> String {
    format!("Invoice_{client_name}")
}

/// Parse one `name,quantity,price` item per line. Blank lines are skipped.
pub fn parse_items(raw: &str) -> Result<Vec<InvoiceItem>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_item(idx + 1, line))
        .collect()
}

fn parse_item(line_no: usize, line: &str) -> Result<InvoiceItem> {
    let fail = |reason: &str| AppError::Format {
        line: line_no,
        content: line.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [name, quantity, price] = fields.as_slice() else {
        return Err(fail("expected name,quantity,price"));
    };

    let quantity: i64 = quantity
        .parse()
        .map_err(|_| fail("quantity must be a whole number"))?;
    let quantity = u64::try_from(quantity).map_err(|_| fail("quantity must not be negative"))?;

    let unit_price: f64 = price.parse().map_err(|_| fail("price must be a number"))?;
    if !unit_price.is_finite() {
        return Err(fail("price must be a number"));
    }
    if unit_price < 0.0 {
        return Err(fail("price must not be negative"));
    }

    Ok(InvoiceItem {
        name: name.to_string(),
        quantity,
        unit_price,
    })
}

pub fn invoice_total(items: &[InvoiceItem]) -> f64 {
    items.iter().map(InvoiceItem::line_total).sum()
}

/// Format an invoice dated today.
pub fn format_invoice(client_name: &str, items: &[InvoiceItem], total: f64) -> String {
    format_invoice_on(Local::now().date_naive(), client_name, items, total)
}

pub fn format_invoice_on(date: NaiveDate, client_name: &str, items: &[InvoiceItem], total: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "INVOICE");
    let _ = writeln!(out, "Date: {}", date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Client: {client_name}");
    let _ = writeln!(out);
    let _ = writeln!(out, "ITEMS:");
    for item in items {
        let _ = writeln!(
            out,
            "{} - {} x ${:.2} = ${:.2}",
            item.name,
            item.quantity,
            item.unit_price,
            item.line_total()
        );
    }
    let _ = writeln!(out);
    let _ = write!(out, "TOTAL AMOUNT: ${total:.2}");
    out
}
