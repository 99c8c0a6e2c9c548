//! Text output formatting with tables and colored status badges.

use chrono::{DateTime, Local, Utc};
use tgadmin_core::{Record, Resource, Tone, status_tone};
use tgadmin_store::{DashboardSummary, Notice, Panel};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

/// Widest a table cell may get before it is cut.
const MAX_CELL: usize = 32;

/// Table columns per resource: header and record field.
fn columns(resource: Resource) -> &'static [(&'static str, &'static str)] {
    match resource {
        Resource::Users => &[
            ("ID", "id"),
            ("Telegram ID", "telegram_user_id"),
            ("Username", "username"),
            ("Name", "first_name"),
            ("Active", "is_active"),
            ("Created", "created_at"),
        ],
        Resource::Bots => &[
            ("ID", "id"),
            ("Name", "bot_name"),
            ("Status", "status"),
            ("Healthy", "is_healthy"),
            ("Repo", "github_repo"),
            ("Created", "created_at"),
        ],
        Resource::Subscriptions => &[
            ("ID", "id"),
            ("User", "user_id"),
            ("Plan", "plan_id"),
            ("Status", "status"),
            ("Ends", "end_at"),
            ("Auto-renew", "auto_renew"),
        ],
        Resource::Payments => &[
            ("ID", "id"),
            ("Amount", "amount"),
            ("Currency", "currency"),
            ("Method", "payment_method"),
            ("Status", "status"),
            ("Created", "created_at"),
        ],
        Resource::Plans => &[
            ("ID", "id"),
            ("Name", "name"),
            ("Days", "duration_days"),
            ("Price", "price"),
            ("Currency", "currency"),
            ("Active", "is_active"),
        ],
        Resource::Auth => &[("ID", "id"), ("Username", "username")],
    }
}

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats records as an aligned table.
    pub fn format_table(&self, resource: Resource, rows: &[Record]) -> String {
        if rows.is_empty() {
            return self.dim(&format!("No {} found", resource.display_name().to_lowercase()));
        }

        let columns = columns(resource);
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|(_, field)| cell_text(row, field))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                cells
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 2);
        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|((header, _), &width)| format!("{header:<width$}"))
            .collect();
        lines.push(self.bold(header.join("  ").trim_end()));
        lines.push(self.dim(&"─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1))));

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(columns.iter().zip(&widths))
                .map(|(text, ((_, field), &width))| {
                    let padded = format!("{text:<width$}");
                    if *field == "status" {
                        self.toned(status_tone(resource, text), &padded)
                    } else {
                        padded
                    }
                })
                .collect();
            lines.push(line.join("  ").trim_end().to_string());
        }

        lines.join("\n")
    }

    /// Formats the pagination footer.
    pub fn format_footer(&self, range: (u64, u64, u64), page: u32, pages: u32) -> String {
        let (first, last, total) = range;
        if total == 0 {
            return self.dim("No results");
        }
        self.dim(&format!(
            "Showing {first} to {last} of {total} results (page {page} of {})",
            pages.max(1)
        ))
    }

    /// Formats one record as `field: value` lines.
    pub fn format_record(&self, resource: Resource, record: &Record) -> String {
        let width = record.fields().keys().map(String::len).max().unwrap_or(0) + 1;
        record
            .fields()
            .keys()
            .map(|key| {
                let value = record.display_field(key);
                let value = if key == "status" {
                    self.toned(status_tone(resource, &value), &value)
                } else {
                    value
                };
                format!("{:<width$} {value}", format!("{key}:"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats a notice as a one-line toast.
    pub fn format_notice(&self, notice: &Notice) -> String {
        if notice.is_failure() {
            self.red(&format!("✗ {}", notice.message))
        } else {
            self.format_success(&notice.message)
        }
    }

    /// Formats a success line.
    pub fn format_success(&self, message: &str) -> String {
        self.green(&format!("✓ {message}"))
    }

    /// Formats the dashboard panels.
    pub fn format_dashboard(&self, summary: &DashboardSummary) -> String {
        let mut lines = vec![self.bold("Dashboard"), "─".repeat(40)];

        for (label, panel) in [
            ("Users", &summary.total_users),
            ("Bots", &summary.total_bots),
            ("Subscriptions", &summary.total_subscriptions),
            ("Payments", &summary.total_payments),
        ] {
            lines.push(format!("{:<15} {}", format!("{label}:"), self.panel_total(panel)));
        }
        lines.push(String::new());

        lines.push(self.bold(&format!(
            "Pending payments ({})",
            count_label(summary.pending_count())
        )));
        lines.push(self.panel_records(Resource::Payments, &summary.pending_payments));
        lines.push(String::new());

        lines.push(self.bold(&format!(
            "Expiring within {} days ({})",
            summary.expiring_days,
            count_label(summary.expiring_count())
        )));
        lines.push(self.panel_records(
            Resource::Subscriptions,
            &summary.expiring_subscriptions,
        ));

        lines.join("\n")
    }

    /// Formats an error line.
    pub fn format_error(&self, error: &str) -> String {
        self.red(&format!("Error: {error}"))
    }

    /// Formats a timestamp in local time.
    pub fn format_time(&self, at: DateTime<Utc>) -> String {
        let local: DateTime<Local> = at.into();
        self.cyan(&local.format("%Y-%m-%d %H:%M").to_string())
    }

    fn panel_total(&self, panel: &Panel<u64>) -> String {
        match (&panel.value, &panel.error) {
            (Some(total), _) => self.blue(&total.to_string()),
            (None, Some(error)) => self.red(error),
            (None, None) => self.dim("-"),
        }
    }

    fn panel_records(&self, resource: Resource, panel: &Panel<Vec<Record>>) -> String {
        match (&panel.value, &panel.error) {
            (Some(rows), _) => self.format_table(resource, rows),
            (None, Some(error)) => self.format_error(error),
            (None, None) => self.dim("-"),
        }
    }

    fn toned(&self, tone: Tone, text: &str) -> String {
        match tone {
            Tone::Success => self.green(text),
            Tone::Warning => self.yellow(text),
            Tone::Error => self.red(text),
            Tone::Info => self.blue(text),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

fn count_label(count: Option<usize>) -> String {
    count.map_or_else(|| "?".to_string(), |n| n.to_string())
}

/// Cell text: timestamps shortened to the date, long values cut.
fn cell_text(row: &Record, field: &str) -> String {
    if let Some(at) = row.timestamp(field) {
        return at.format("%Y-%m-%d").to_string();
    }
    truncate(&row.display_field(field), MAX_CELL)
}

/// Cuts `text` to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
