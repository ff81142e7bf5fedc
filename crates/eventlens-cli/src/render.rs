//! Plain-text rendering of the state tree
//!
//! Every function returns a `String` so output can be tested without a
//! terminal.

use eventlens_app::selectors::{
    addresses_hint, can_compare, comparison_rows, event_rows, events_hint, is_address_selected,
    undeleted_addresses, EventRow,
};
use eventlens_app::{Address, DiffRow, DiffSummary, UserId, ViewState};
use serde_json::Value;
use std::fmt::Write;

/// One user id per line.
pub fn users(ids: &[UserId]) -> String {
    if ids.is_empty() {
        return "No users found.\n".to_string();
    }
    ids.iter().map(|id| format!("{id}\n")).collect()
}

/// The address list, optionally including soft-deleted entries.
pub fn addresses(state: &ViewState, include_deleted: bool) -> String {
    let shown: Vec<&Address> = if include_deleted {
        state.addresses().iter().collect()
    } else {
        undeleted_addresses(state.addresses())
    };
    if shown.is_empty() {
        return match addresses_hint(state) {
            Some(hint) => format!("{hint}\n"),
            None => "No addresses found.\n".to_string(),
        };
    }

    let mut out = String::new();
    for address in shown {
        let marker = if is_address_selected(state, &address.id) {
            '*'
        } else {
            ' '
        };
        let _ = write!(out, "{marker} {}", address.id);
        for (key, value) in address.fields.iter() {
            let _ = write!(out, "  {key}={}", cell(Some(value)));
        }
        if address.deleted {
            out.push_str("  [deleted]");
        }
        out.push('\n');
    }
    out
}

fn event_line(index: usize, row: &EventRow) -> String {
    let check = match (row.selected, row.enabled) {
        (true, _) => "[x]",
        (false, true) => "[ ]",
        (false, false) => "[-]",
    };
    format!("{check} {index:>2}  {}  {}\n", row.label, row.guid)
}

/// The event list with selection state.
pub fn events(state: &ViewState) -> String {
    if let Some(hint) = events_hint(state) {
        return format!("{hint}\n");
    }
    event_rows(state)
        .iter()
        .enumerate()
        .map(|(i, row)| event_line(i, row))
        .collect()
}

/// Text of one diff cell: strings bare, missing fields as `-`, other values
/// as compact JSON.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// The comparison table. Differing rows are marked with `*`.
pub fn diff_table(rows: &[DiffRow], show_unchanged: bool) -> String {
    let shown: Vec<[String; 3]> = rows
        .iter()
        .filter(|r| show_unchanged || r.differs)
        .map(|r| {
            [
                r.key.clone(),
                cell(r.value_a.as_ref()),
                cell(r.value_b.as_ref()),
            ]
        })
        .collect();
    let marks: Vec<bool> = rows
        .iter()
        .filter(|r| show_unchanged || r.differs)
        .map(|r| r.differs)
        .collect();

    let header = ["Key".to_string(), "Event 1".to_string(), "Event 2".to_string()];
    let mut widths = header.clone().map(|h| h.len());
    for cells in &shown {
        for (w, c) in widths.iter_mut().zip(cells) {
            *w = (*w).max(c.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, mark: char, cells: &[String; 3]| {
        let _ = writeln!(
            out,
            "{mark} {:<w0$} | {:<w1$} | {}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1],
        );
    };
    line(&mut out, ' ', &header);
    let _ = writeln!(out, "  {}", "-".repeat(widths[0] + widths[1] + widths[2] + 6));
    for (cells, differs) in shown.iter().zip(marks) {
        line(&mut out, if differs { '*' } else { ' ' }, cells);
    }

    let summary = DiffSummary::of(rows);
    let _ = writeln!(
        out,
        "\n{} of {} fields differ",
        summary.differing, summary.total
    );
    out
}

/// The whole tree, as shown after each `session` command.
pub fn state(state: &ViewState, show_unchanged: bool) -> String {
    let mut out = String::new();
    match state.selected_user_id() {
        Some(user) => {
            let _ = writeln!(out, "user: {user}");
        }
        None => {
            let _ = writeln!(out, "user: (none of {})", state.user_ids().len());
        }
    }

    out.push_str("addresses:\n");
    out.push_str(&indent(&addresses(state, false)));
    out.push_str("events:\n");
    out.push_str(&indent(&events(state)));

    if state.comparing_events() {
        match comparison_rows(state) {
            Some(rows) => {
                out.push_str("comparison:\n");
                out.push_str(&indent(&diff_table(&rows, show_unchanged)));
            }
            None => out.push_str("comparison: loading\n"),
        }
    } else if can_compare(state.selected_events()) {
        out.push_str("comparison: ready (`compare`)\n");
    }

    if let Some(error) = state.error() {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

fn indent(block: &str) -> String {
    block.lines().map(|l| format!("  {l}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventlens_app::{diff, Record};
    use serde_json::json;

    fn rec(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_cells() {
        assert_eq!(cell(None), "-");
        assert_eq!(cell(Some(&json!("login"))), "login");
        assert_eq!(cell(Some(&json!(42))), "42");
        assert_eq!(cell(Some(&json!({"a": [1]}))), r#"{"a":[1]}"#);
    }

    #[test]
    fn test_diff_table_marks_differing_rows() {
        let rows = diff(&rec(json!({"id": 1, "ip": "a"})), &rec(json!({"id": 2, "ip": "b"})));
        let table = diff_table(&rows, true);
        let lines: Vec<_> = table.lines().collect();
        assert!(lines[0].contains("Key"));
        assert!(lines[2].starts_with("  id"));
        assert!(lines[3].starts_with("* ip"));
        assert!(table.ends_with("1 of 2 fields differ\n"));
    }

    #[test]
    fn test_diff_table_can_hide_unchanged() {
        let rows = diff(&rec(json!({"id": 1, "ip": "a"})), &rec(json!({"id": 2, "ip": "b"})));
        let table = diff_table(&rows, false);
        assert!(!table.contains("  id "));
        assert!(table.contains("* ip"));
    }

    #[test]
    fn test_empty_state() {
        let out = state(&ViewState::init(), true);
        assert!(out.contains("user: (none of 0)"));
        assert!(out.contains("Choose a user ID from the dropdown above."));
        assert!(out.contains("Select an address to see events"));
        assert!(!out.contains("error:"));
    }

    #[test]
    fn test_users() {
        assert_eq!(users(&[]), "No users found.\n");
        let ids = [UserId::new("u1").unwrap(), UserId::new("u2").unwrap()];
        assert_eq!(users(&ids), "u1\nu2\n");
    }
}
