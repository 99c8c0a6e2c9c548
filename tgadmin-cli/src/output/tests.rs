//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, truncate};
    use serde_json::json;
    use tgadmin_core::{Record, Resource};
    use tgadmin_store::{DashboardSummary, Notice, Panel};

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn loaded<T>(value: T) -> Panel<T> {
        Panel {
            value: Some(value),
            error: None,
        }
    }

    fn failed<T>(error: &str) -> Panel<T> {
        Panel {
            value: None,
            error: Some(error.to_string()),
        }
    }

    #[test]
    fn test_table_has_header_and_rows() {
        let formatter = TextFormatter::new(false);
        let rows = vec![
            record(json!({ "id": "b1", "bot_name": "shop", "status": "running" })),
            record(json!({ "id": "b2", "bot_name": "support", "status": "stopped" })),
        ];

        let output = formatter.format_table(Resource::Bots, &rows);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("ID"));
        assert!(lines[0].contains("Status"));
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("shop"));
        assert!(lines[3].contains("stopped"));
    }

    #[test]
    fn test_table_columns_align() {
        let formatter = TextFormatter::new(false);
        let rows = vec![
            record(json!({ "id": "p1", "amount": "10.00", "status": "pending" })),
            record(json!({ "id": "p-long-id", "amount": "5.00", "status": "confirmed" })),
        ];

        let output = formatter.format_table(Resource::Payments, &rows);
        let lines: Vec<&str> = output.lines().collect();

        let amount_col = lines[0].find("Amount").unwrap();
        assert_eq!(lines[2].find("10.00"), Some(amount_col));
        assert_eq!(lines[3].find("5.00"), Some(amount_col));
    }

    #[test]
    fn test_status_colored_by_tone() {
        let formatter = TextFormatter::new(true);
        let rows = vec![
            record(json!({ "id": "p1", "status": "confirmed" })),
            record(json!({ "id": "p2", "status": "rejected" })),
        ];

        let output = formatter.format_table(Resource::Payments, &rows);
        assert!(output.contains("\x1b[32mconfirmed"), "confirmed should be green");
        assert!(output.contains("\x1b[31mrejected"), "rejected should be red");
    }

    #[test]
    fn test_no_colors_when_disabled() {
        let formatter = TextFormatter::new(false);
        let rows = vec![record(json!({ "id": "b1", "status": "error" }))];
        let output = formatter.format_table(Resource::Bots, &rows);
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_empty_table() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_table(Resource::Users, &[]);
        assert_eq!(output, "No users found");
    }

    #[test]
    fn test_timestamps_shortened_to_date() {
        let formatter = TextFormatter::new(false);
        let rows = vec![record(json!({
            "id": "u1",
            "created_at": "2024-03-05T10:20:30Z"
        }))];
        let output = formatter.format_table(Resource::Users, &rows);
        assert!(output.contains("2024-03-05"));
        assert!(!output.contains("10:20:30"));
    }

    #[test]
    fn test_footer() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_footer((11, 20, 25), 2, 3),
            "Showing 11 to 20 of 25 results (page 2 of 3)"
        );
        assert_eq!(formatter.format_footer((0, 0, 0), 1, 0), "No results");
    }

    #[test]
    fn test_record_lines() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_record(
            Resource::Users,
            &record(json!({ "id": "u1", "username": "alice", "last_name": null })),
        );
        assert!(output.contains("id:"));
        assert!(output.contains("alice"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_notice() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_notice(&Notice::success("Payment rejected")),
            "✓ Payment rejected"
        );
        assert_eq!(
            formatter.format_notice(&Notice::failure("Failed to start bot: busy")),
            "✗ Failed to start bot: busy"
        );
    }

    #[test]
    fn test_dashboard_shows_failed_panel() {
        let formatter = TextFormatter::new(false);
        let summary = DashboardSummary {
            total_users: loaded(42),
            total_bots: loaded(25),
            total_subscriptions: failed("HTTP 500: database down"),
            total_payments: loaded(9),
            pending_payments: loaded(vec![record(json!({ "id": "p1", "status": "pending" }))]),
            expiring_subscriptions: failed("Reminder service down"),
            expiring_days: 7,
        };

        let output = formatter.format_dashboard(&summary);
        assert!(output.contains("42"));
        assert!(output.contains("HTTP 500: database down"));
        assert!(output.contains("Pending payments (1)"));
        assert!(output.contains("Expiring within 7 days (?)"));
        assert!(output.contains("Reminder service down"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{ActionOutput, JsonFormatter, ListOutput};
    use serde_json::{Value, json};
    use tgadmin_core::{Record, Resource};
    use tgadmin_store::Notice;

    #[test]
    fn test_list_output() {
        let formatter = JsonFormatter::new(false);
        let items: Vec<Record> = serde_json::from_value(json!([{ "id": "b1" }])).unwrap();
        let output = ListOutput {
            resource: Resource::Bots,
            page: 1,
            size: 10,
            total: 25,
            pages: 3,
            status: None,
            search: None,
            items,
        };

        let parsed: Value = serde_json::from_str(&formatter.format(&output).unwrap()).unwrap();
        assert_eq!(parsed["resource"], "bots");
        assert_eq!(parsed["pages"], 3);
        assert_eq!(parsed["items"][0]["id"], "b1");
        assert!(parsed.get("status").is_none());
    }

    #[test]
    fn test_action_output_from_notice() {
        let formatter = JsonFormatter::new(false);
        let output = ActionOutput::from_notice(
            &Notice::success("Bot started successfully"),
            Some(json!({ "message": "Bot started" })),
        );

        let parsed: Value = serde_json::from_str(&formatter.format(&output).unwrap()).unwrap();
        assert_eq!(parsed["ok"], true);
        assert_eq!(parsed["message"], "Bot started successfully");
        assert_eq!(parsed["result"]["message"], "Bot started");
    }

    #[test]
    fn test_pretty_output() {
        let formatter = JsonFormatter::new(true);
        let output = formatter.format(&json!({ "a": 1 })).unwrap();
        assert!(output.contains('\n'));
    }
}
