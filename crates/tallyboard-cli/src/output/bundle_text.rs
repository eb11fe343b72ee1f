use std::io;

use serde_json::Value;

use super::format::{Column, key_value_rows, money, percent, rows_of, table, text};

pub fn render(command: &str, data: &Value) -> io::Result<String> {
    let lines = match command {
        "daily" => daily(data),
        "trends" => trends(data),
        "savings" => savings(data),
        "grocery-vs-restaurant" => grocery_vs_restaurant(data),
        "stats" => stats(data),
        "count" => count(data),
        "analytics" => analytics(data),
        "library" => library(data),
        "invalidate" => invalidate(data),
        "reload" => reload(data),
        _ => {
            return Err(io::Error::other(format!(
                "unsupported text output command `{command}`"
            )));
        }
    };
    Ok(lines.join("\n"))
}

fn heading(title: &str, data: &Value) -> Vec<String> {
    let start = data["range"]["start"]
        .as_str()
        .map(|value| value.get(..10).unwrap_or(value).to_string())
        .unwrap_or_else(|| "beginning".to_string());
    let end = data["range"]["end"].as_str().unwrap_or("now");
    let mut lines = vec![format!(
        "{title} ({}: {start} to {})",
        text(&data["filter"]),
        end.get(..10).unwrap_or(end)
    )];
    if data["filter_recognized"] == false {
        lines.push("  Unrecognized filter; showing all records.".to_string());
    }
    lines.push(String::new());
    lines
}

fn day_rows(days: &Value) -> Vec<Vec<String>> {
    rows_of(days)
        .iter()
        .map(|day| {
            vec![
                text(&day["date"]),
                text(&day["count"]),
                money(&day["total"]),
            ]
        })
        .collect()
}

fn daily(data: &Value) -> Vec<String> {
    let mut lines = heading("Daily totals", data);
    if rows_of(&data["days"]).is_empty() {
        lines.push("  No days in range.".to_string());
        return lines;
    }
    lines.extend(table(
        &[
            Column::left("Date"),
            Column::right("Count"),
            Column::right("Total"),
        ],
        &day_rows(&data["days"]),
    ));
    lines.push(String::new());
    lines.extend(key_value_rows(&[
        ("Transactions", text(&data["transaction_count"])),
        ("Net", money(&data["net_total"])),
    ]));
    lines
}

fn trend_summary(data: &Value) -> Vec<String> {
    key_value_rows(&[
        ("Current period", money(&data["current_period_total"])),
        ("Prior period", money(&data["prior_period_total"])),
        ("Change", percent(&data["percent_change"])),
        ("Direction", text(&data["direction"])),
    ])
}

fn trends(data: &Value) -> Vec<String> {
    let mut lines = heading("Trends", data);
    lines.extend(trend_summary(data));
    let categories = rows_of(&data["categories"])
        .iter()
        .map(|row| {
            vec![
                text(&row["category"]),
                money(&row["current_period_total"]),
                money(&row["prior_period_total"]),
                percent(&row["percent_change"]),
                text(&row["direction"]),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    if !categories.is_empty() {
        lines.push(String::new());
        lines.extend(table(
            &[
                Column::left("Category"),
                Column::right("Current"),
                Column::right("Prior"),
                Column::right("Change"),
                Column::left("Direction"),
            ],
            &categories,
        ));
    }
    lines
}

fn savings_summary(data: &Value) -> Vec<String> {
    key_value_rows(&[
        ("Inflow", money(&data["inflow"])),
        ("Outflow", money(&data["outflow"])),
        ("Net savings", money(&data["net_savings"])),
        ("Prior period", money(&data["prior_net_savings"])),
        ("Change", percent(&data["percent_change"])),
        ("Direction", text(&data["direction"])),
        ("Savings balance", money(&data["savings_balance"])),
    ])
}

fn savings(data: &Value) -> Vec<String> {
    let mut lines = heading("Savings", data);
    lines.extend(savings_summary(data));
    lines
}

fn bucket_rows(data: &Value) -> Vec<Vec<String>> {
    ["grocery", "restaurant"]
        .iter()
        .map(|bucket| {
            vec![
                (*bucket).to_string(),
                text(&data[*bucket]["count"]),
                money(&data[*bucket]["total"]),
            ]
        })
        .collect()
}

fn grocery_vs_restaurant(data: &Value) -> Vec<String> {
    let mut lines = heading("Grocery vs restaurant", data);
    lines.extend(table(
        &[
            Column::left("Bucket"),
            Column::right("Count"),
            Column::right("Spent"),
        ],
        &bucket_rows(data),
    ));
    if let Some(share) = data["grocery_share"].as_f64() {
        lines.push(String::new());
        lines.push(format!("  Groceries are {:.1}% of the combined spend.", share * 100.0));
    }
    lines
}

fn stats_summary(data: &Value) -> Vec<String> {
    let top = if data["top_category"].is_null() {
        "-".to_string()
    } else {
        format!(
            "{} ({})",
            text(&data["top_category"]["category"]),
            money(&data["top_category"]["spent"])
        )
    };
    key_value_rows(&[
        ("Spent", money(&data["total_spent"])),
        ("Income", money(&data["total_income"])),
        ("Net", money(&data["net"])),
        ("Transactions", text(&data["transaction_count"])),
        ("Receipts", text(&data["receipt_count"])),
        ("Average spend", money(&data["average_spend"])),
        ("Top category", top),
    ])
}

fn stats(data: &Value) -> Vec<String> {
    let mut lines = heading("Dashboard stats", data);
    lines.extend(stats_summary(data));
    lines
}

fn count(data: &Value) -> Vec<String> {
    let mut lines = heading("Transaction count", data);
    lines.push(format!("  {}", text(&data["count"])));
    lines
}

fn analytics(data: &Value) -> Vec<String> {
    let mut lines = heading("Analytics", data);
    lines.push("Stats".to_string());
    lines.extend(stats_summary(&data["stats"]));
    lines.push(String::new());
    lines.push("Trends".to_string());
    lines.extend(trend_summary(&data["trends"]));
    lines.push(String::new());
    lines.push("Savings".to_string());
    lines.extend(savings_summary(&data["savings"]));
    lines.push(String::new());
    lines.push("Grocery vs restaurant".to_string());
    lines.extend(table(
        &[
            Column::left("Bucket"),
            Column::right("Count"),
            Column::right("Spent"),
        ],
        &bucket_rows(&data["grocery_vs_restaurant"]),
    ));
    lines.push(String::new());
    lines.push(format!(
        "Daily series: {} days, {} transactions",
        rows_of(&data["daily"]["days"]).len(),
        text(&data["count"])
    ));
    lines
}

fn library(data: &Value) -> Vec<String> {
    let mut lines = heading("Data library", data);

    let transactions = rows_of(&data["transactions"])
        .iter()
        .map(|row| {
            vec![
                text(&row["timestamp"]),
                text(&row["merchant"]),
                text(&row["category"]),
                money(&row["amount"]),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.push(format!("Transactions ({})", transactions.len()));
    if !transactions.is_empty() {
        lines.extend(table(
            &[
                Column::left("Timestamp"),
                Column::left("Merchant"),
                Column::left("Category"),
                Column::right("Amount"),
            ],
            &transactions,
        ));
    }

    let categories = rows_of(&data["categories"])
        .iter()
        .map(|row| {
            vec![
                text(&row["category"]),
                text(&row["bucket"]),
                text(&row["count"]),
                money(&row["net_total"]),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.push(String::new());
    lines.push(format!("Categories ({})", categories.len()));
    if !categories.is_empty() {
        lines.extend(table(
            &[
                Column::left("Category"),
                Column::left("Bucket"),
                Column::right("Count"),
                Column::right("Net"),
            ],
            &categories,
        ));
    }

    lines.push(String::new());
    lines.push(format!("Receipts ({})", rows_of(&data["receipts"]).len()));

    let balances = rows_of(&data["balances"])
        .iter()
        .map(|row| {
            vec![
                text(&row["name"]),
                text(&row["kind"]),
                money(&row["balance"]),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    if !balances.is_empty() {
        lines.push(String::new());
        lines.push("Balances".to_string());
        lines.extend(table(
            &[
                Column::left("Account"),
                Column::left("Kind"),
                Column::right("Balance"),
            ],
            &balances,
        ));
    }
    lines
}

fn invalidate(data: &Value) -> Vec<String> {
    vec![format!(
        "Marked {} caches stale through generation {}.",
        text(&data["scope"]),
        text(&data["generation"])
    )]
}

fn reload(data: &Value) -> Vec<String> {
    let mut lines = vec![format!("Reloaded records from {}.", text(&data["source"]))];
    lines.extend(key_value_rows(&[
        (
            "Generation",
            format!(
                "{} -> {}",
                text(&data["previous_generation"]),
                text(&data["generation"])
            ),
        ),
        ("Transactions", text(&data["transaction_count"])),
    ]));
    lines
}
