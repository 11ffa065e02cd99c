//! Tickets command - support desk operations

use super::{build_client, Outcome};
use crate::output::{format_count, format_duration, print_json, truncate, Status};
use crate::OutputFormat;
use anyhow::Result;
use clap::Subcommand;
use ecopulse_api_client::endpoints::{
    AdminUser, AssignedFilter, NewTicket, Ticket, TicketFilters, TicketPriority, TicketStats,
    TicketStatus,
};
use ecopulse_api_client::NormalizedResult;
use ecopulse_telemetry::Timer;
use owo_colors::OwoColorize;
use serde_json::Value;
use std::path::Path;

#[derive(Subcommand)]
pub enum TicketAction {
    /// List your own tickets
    Mine,

    /// List all tickets (admin)
    List {
        /// Only tickets with this status (open, in-progress, resolved, closed)
        #[arg(long)]
        status: Option<TicketStatus>,

        /// Only tickets in this category
        #[arg(long)]
        category: Option<String>,

        /// Assignee filter (me, unassigned)
        #[arg(long)]
        assigned: Option<AssignedFilter>,
    },

    /// Ticket counts by status (admin)
    Stats,

    /// Show one ticket with its messages
    Show {
        /// Ticket ID
        id: String,
    },

    /// Open a new ticket
    Create {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        category: String,

        /// Opening message
        #[arg(long)]
        message: String,

        /// low, medium, high or urgent
        #[arg(long)]
        priority: Option<TicketPriority>,
    },

    /// Change a ticket's status (admin)
    Status {
        id: String,
        status: TicketStatus,
    },

    /// Reply to a ticket
    Reply {
        id: String,
        content: String,
    },

    /// Assign a ticket to an admin (admin)
    Assign {
        id: String,
        admin_id: String,
    },

    /// Delete a ticket
    Delete {
        id: String,
    },

    /// List admins tickets can be assigned to
    Admins,
}

/// Run tickets command
pub async fn run(action: TicketAction, config_path: Option<&Path>, format: OutputFormat) -> Result<Outcome> {
    let client = build_client(config_path)?;
    let tickets = client.tickets();
    let timer = Timer::start("ecopulse_tickets_command_ms");

    let outcome = match action {
        TicketAction::Mine => report(tickets.user_tickets().await, format, print_ticket_list)?,
        TicketAction::List {
            status,
            category,
            assigned,
        } => {
            let filters = TicketFilters {
                status,
                category,
                assigned,
            };
            report(tickets.all(&filters).await, format, print_ticket_list)?
        }
        TicketAction::Stats => report(tickets.stats().await, format, print_stats)?,
        TicketAction::Show { id } => report(tickets.get(&id).await, format, print_ticket)?,
        TicketAction::Create {
            subject,
            category,
            message,
            priority,
        } => {
            let ticket = NewTicket {
                subject,
                category,
                priority,
                description: message,
            };
            report(tickets.create(&ticket).await, format, |data| {
                announce("Ticket created", data);
            })?
        }
        TicketAction::Status { id, status } => {
            report(tickets.update_status(&id, status).await, format, |data| {
                announce(&format!("Status set to {status}"), data);
            })?
        }
        TicketAction::Reply { id, content } => {
            report(tickets.reply(&id, &content).await, format, |data| {
                announce("Reply sent", data);
            })?
        }
        TicketAction::Assign { id, admin_id } => {
            report(tickets.assign(&id, &admin_id).await, format, |data| {
                announce(&format!("Assigned to {admin_id}"), data);
            })?
        }
        TicketAction::Delete { id } => {
            let result = tickets.delete(&id).await;
            if format == OutputFormat::Json {
                print_json(&result)?;
            } else if result.success {
                Status::success(&result.message);
            } else {
                Status::error(&result.message);
            }
            Outcome::from(result.success)
        }
        TicketAction::Admins => report(tickets.admins().await, format, print_admins)?,
    };

    let elapsed = timer.stop();
    tracing::debug!(elapsed = %format_duration(elapsed), "Tickets command finished");
    Ok(outcome)
}

/// Print a normalized result; JSON prints the envelope as-is
fn report(result: NormalizedResult, format: OutputFormat, render: impl FnOnce(&Value)) -> Result<Outcome> {
    if format == OutputFormat::Json {
        print_json(&result)?;
    } else if result.success {
        render(&result.data);
    } else {
        Status::error(result.message.as_deref().unwrap_or("Request failed"));
    }
    Ok(Outcome::from(result.success))
}

fn announce(message: &str, data: &Value) {
    match serde_json::from_value::<Ticket>(data.clone()) {
        Ok(ticket) => Status::success(&format!("{message}: {} {}", ticket.id, ticket.subject.dimmed())),
        Err(_) => Status::success(message),
    }
}

fn print_raw(data: &Value) {
    match serde_json::to_string_pretty(data) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{data}"),
    }
}

fn status_label(status: TicketStatus) -> String {
    match status {
        TicketStatus::Open => status.to_string().yellow().to_string(),
        TicketStatus::InProgress => status.to_string().blue().to_string(),
        TicketStatus::Resolved => status.to_string().green().to_string(),
        TicketStatus::Closed => status.to_string().dimmed().to_string(),
    }
}

fn print_ticket_list(data: &Value) {
    let tickets: Vec<Ticket> = match serde_json::from_value(data.clone()) {
        Ok(tickets) => tickets,
        Err(e) => {
            tracing::warn!(error = %e, "Ticket list did not match the expected shape");
            print_raw(data);
            return;
        }
    };

    Status::header(&format_count(tickets.len(), "ticket", "tickets"));
    if tickets.is_empty() {
        return;
    }
    println!(
        "  {:<26} {:<12} {:<8} {}",
        "ID".dimmed(),
        "Status".dimmed(),
        "Priority".dimmed(),
        "Subject".dimmed()
    );
    for ticket in &tickets {
        // Pad before colouring so escape codes do not break alignment
        let status = format!("{:<12}", ticket.status.as_str());
        let status = status.replace(ticket.status.as_str(), &status_label(ticket.status));
        println!(
            "  {:<26} {} {:<8} {}",
            ticket.id,
            status,
            ticket.priority.as_str(),
            truncate(&ticket.subject, 48)
        );
    }
}

fn print_ticket(data: &Value) {
    let ticket: Ticket = match serde_json::from_value(data.clone()) {
        Ok(ticket) => ticket,
        Err(_) => {
            print_raw(data);
            return;
        }
    };

    Status::header(&ticket.subject);
    if let Some(ref number) = ticket.ticket_number {
        println!("  {:<10} {}", "Number".dimmed(), number);
    }
    println!("  {:<10} {}", "Status".dimmed(), status_label(ticket.status));
    println!("  {:<10} {}", "Category".dimmed(), ticket.category);
    let assignee = ticket
        .assigned_to
        .as_ref()
        .map_or_else(|| "unassigned".to_string(), |user| user.id().to_string());
    println!("  {:<10} {}", "Assigned".dimmed(), assignee);
    println!();
    for message in &ticket.messages {
        let who = if message.is_admin { "admin".cyan().to_string() } else { "user".to_string() };
        let when = message.timestamp.as_deref().unwrap_or("");
        println!("  {} {}", who.bold(), when.dimmed());
        println!("    {}", message.content);
    }
}

fn print_stats(data: &Value) {
    let stats: TicketStats = match serde_json::from_value(data.clone()) {
        Ok(stats) => stats,
        Err(_) => {
            print_raw(data);
            return;
        }
    };

    Status::header("Ticket statistics");
    for (label, count) in [
        ("Total", stats.total),
        ("Open", stats.open),
        ("In progress", stats.in_progress),
        ("Resolved", stats.resolved),
        ("Closed", stats.closed),
        ("Unassigned", stats.unassigned),
    ] {
        println!("  {:<12} {}", label.dimmed(), count);
    }
}

fn print_admins(data: &Value) {
    let admins: Vec<AdminUser> = match serde_json::from_value(data.clone()) {
        Ok(admins) => admins,
        Err(_) => {
            print_raw(data);
            return;
        }
    };

    Status::header(&format_count(admins.len(), "admin", "admins"));
    for admin in &admins {
        println!(
            "  {:<26} {}",
            admin.id,
            admin.display_name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        action: TicketAction,
    }

    fn parse(args: &[&str]) -> TicketAction {
        let mut argv = vec!["tickets"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().action
    }

    #[test]
    fn test_parse_list_filters() {
        match parse(&["list", "--status", "in-progress", "--assigned", "me"]) {
            TicketAction::List {
                status,
                category,
                assigned,
            } => {
                assert_eq!(status, Some(TicketStatus::InProgress));
                assert_eq!(category, None);
                assert_eq!(assigned, Some(AssignedFilter::Me));
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_create() {
        match parse(&[
            "create", "--subject", "Meter offline", "--category", "technical", "--message", "No data since Monday",
            "--priority", "high",
        ]) {
            TicketAction::Create { priority, message, .. } => {
                assert_eq!(priority, Some(TicketPriority::High));
                assert_eq!(message, "No data since Monday");
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_status() {
        let argv = ["tickets", "status", "t1", "pending"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_report_outcome_follows_success() {
        let ok = report(NormalizedResult::ok(Value::Array(vec![])), OutputFormat::Json, |_| {}).unwrap();
        assert_eq!(ok, Outcome::Success);

        let failed = report(
            NormalizedResult::failure(Value::Null, "Ticket not found"),
            OutputFormat::Text,
            |_| panic!("failures are not rendered"),
        )
        .unwrap();
        assert_eq!(failed, Outcome::Unsuccessful);
    }
}
