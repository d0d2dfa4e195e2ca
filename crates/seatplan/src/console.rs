//! Colorful console output for allocation runs.
//!
//! Provides a custom `tracing` layer that formats engine events with colors.
//! Initialized by [`allocate`](crate::allocate) when the `console` feature
//! is enabled, or call [`init`] directly.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes the allocation console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing beyond the banner when another global subscriber is installed.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "seatplan_engine=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SeatPlanConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!(
        "seatplan v{} - Exam Seat Allocation",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats allocation events with colors.
pub struct SeatPlanConsoleLayer;

impl<S: Subscriber> Layer<S> for SeatPlanConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Only handle engine events
        if !metadata.target().starts_with("seatplan_engine") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_allocation_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    exam_slot: Option<String>,
    students: Option<u64>,
    primary_capacity: Option<u64>,
    backup_capacity: Option<u64>,
    uses_backup: Option<bool>,
    seated: Option<u64>,
    violations: Option<u64>,
    swaps: Option<u64>,
    unresolved: Option<u64>,
    rooms_used: Option<u64>,
    warnings: Option<u64>,
    elapsed_ms: Option<u64>,
    reason: Option<String>,
    error: Option<String>,
    warning: Option<String>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field, s);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "students" => self.students = Some(value),
            "primary_capacity" => self.primary_capacity = Some(value),
            "backup_capacity" => self.backup_capacity = Some(value),
            "seated" => self.seated = Some(value),
            "violations" => self.violations = Some(value),
            "swaps" => self.swaps = Some(value),
            "unresolved" => self.unresolved = Some(value),
            "rooms_used" => self.rooms_used = Some(value),
            "warnings" => self.warnings = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "uses_backup" {
            self.uses_backup = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "exam_slot" => self.exam_slot = Some(value),
            "reason" => self.reason = Some(value),
            "error" => self.error = Some(value),
            "warning" => self.warning = Some(value),
            _ => {}
        }
    }
}

fn format_allocation_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "allocation_start" => format_start(v),
        "capacity_planned" => format_capacity(v),
        "seats_assigned" => format_assigned(v),
        "adjacency_resolved" => format_resolved(v),
        "allocation_committed" => format_committed(v),
        "allocation_failed" => format_failed(v),
        "allocation_rolled_back" => format_rolled_back(v),
        "allocation_warning" => format_warning(v),
        _ => String::new(),
    }
}

fn prefix(level: &str) -> String {
    let level = match level {
        "ERROR" => level.bright_red().to_string(),
        "WARN" => level.bright_yellow().to_string(),
        _ => level.bright_green().to_string(),
    };
    format!("{} {} {}", timestamp().bright_black(), level, "[Allocator]".bright_cyan())
}

fn slot(v: &EventVisitor) -> &str {
    v.exam_slot.as_deref().unwrap_or("?")
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_start(v: &EventVisitor) -> String {
    format!(
        "{} Allocation started for exam slot ({})",
        prefix("INFO"),
        slot(v).white().bold()
    )
}

fn format_capacity(v: &EventVisitor) -> String {
    let backup = if v.uses_backup.unwrap_or(false) {
        "in use".bright_yellow().to_string()
    } else {
        "idle".white().to_string()
    };
    format!(
        "{} Capacity planned: students ({}), primary seats ({}), backup seats ({}, {})",
        prefix("INFO"),
        count(v.students).bright_yellow(),
        count(v.primary_capacity).bright_yellow(),
        count(v.backup_capacity).bright_yellow(),
        backup
    )
}

fn format_assigned(v: &EventVisitor) -> String {
    format!(
        "{} Seats assigned ({})",
        prefix("INFO"),
        count(v.seated).bright_yellow()
    )
}

fn format_resolved(v: &EventVisitor) -> String {
    let unresolved = v.unresolved.unwrap_or(0);
    let unresolved_str = if unresolved > 0 {
        count(v.unresolved).bright_red().to_string()
    } else {
        count(v.unresolved).bright_green().to_string()
    };
    format!(
        "{} Adjacency repaired: violations ({}), swaps ({}), unresolved ({})",
        prefix("INFO"),
        count(v.violations).yellow(),
        count(v.swaps).bright_magenta(),
        unresolved_str
    )
}

fn format_committed(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} Allocation committed for exam slot ({}) in {}",
        prefix("INFO"),
        slot(v).white().bold(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow()
    );

    let rows = [
        ("Students seated:", count(v.students)),
        ("Rooms used:", count(v.rooms_used)),
        ("Swaps:", count(v.swaps)),
        ("Unresolved pairs:", count(v.unresolved)),
        ("Warnings:", count(v.warnings)),
    ];

    output.push_str("\n\n");
    output.push_str(&"╔══════════════════════════════════════════════╗".bright_cyan().to_string());
    output.push('\n');
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<20}{:>22}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }
    output.push_str(&"╚══════════════════════════════════════════════╝".bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_failed(v: &EventVisitor) -> String {
    format!(
        "{} Allocation failed for exam slot ({}): {}",
        prefix("INFO"),
        slot(v).white().bold(),
        v.reason.as_deref().unwrap_or("unknown").bright_red()
    )
}

fn format_rolled_back(v: &EventVisitor) -> String {
    format!(
        "{} Allocation rolled back for exam slot ({}): {}",
        prefix("ERROR"),
        slot(v).white().bold(),
        v.error.as_deref().unwrap_or("unknown").bright_red()
    )
}

fn format_warning(v: &EventVisitor) -> String {
    format!(
        "{} {}",
        prefix("WARN"),
        v.warning.as_deref().unwrap_or("").yellow()
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            exam_slot: Some("MATH-101".to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_event_is_silent() {
        assert!(format_allocation_event(&visitor("phase_transition")).is_empty());
        assert!(format_allocation_event(&EventVisitor::default()).is_empty());
    }

    #[test]
    fn test_committed_summary_box() {
        let mut v = visitor("allocation_committed");
        v.students = Some(1234);
        v.rooms_used = Some(3);
        v.elapsed_ms = Some(42);

        let output = format_allocation_event(&v);
        assert!(output.contains("MATH-101"));
        assert!(output.contains("1,234"));
        assert!(output.contains("Rooms used:"));
        assert!(output.contains("42ms"));
    }

    #[test]
    fn test_failure_lines_carry_reason() {
        let mut v = visitor("allocation_failed");
        v.reason = Some("No rooms available for allocation.".to_string());
        let output = format_allocation_event(&v);
        assert!(output.contains("No rooms available"));

        let mut v = visitor("allocation_rolled_back");
        v.error = Some("store unavailable".to_string());
        let output = format_allocation_event(&v);
        assert!(output.contains("store unavailable"));
    }

    #[test]
    fn test_warning_line() {
        let mut v = visitor("allocation_warning");
        v.warning = Some("Primary rooms insufficient".to_string());
        assert!(format_allocation_event(&v).contains("Primary rooms insufficient"));
    }
}
