use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::Value;

use crate::app::AppState;
use crate::model::status_class;

/// Read-only summary of the handed-off user; nothing but the frame when
/// no user was stored.
pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("User Details  (Esc: back to users)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    let Some(user) = app.detail.as_ref() else {
        f.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(app.theme.muted);
    let value = Style::default().fg(app.theme.text);
    let kv = |k: &str, v: String| Line::from(vec![Span::styled(format!("{k:<16}"), label), Span::styled(v, value)]);

    let mut lines = vec![
        Line::from(Span::styled(
            user.full_name().unwrap_or(user.username()).to_string(),
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )),
        kv("Username", user.username().to_string()),
        kv("Email", user.email().to_string()),
        kv("Phone number", user.phone_number().to_string()),
        kv("Organization", user.organization.clone()),
        kv("Date joined", user.date_joined.clone()),
        Line::from(vec![
            Span::styled(format!("{:<16}", "Status"), label),
            Span::styled(status_class(user.status), Style::default().fg(app.theme.status_color(user.status))),
        ]),
    ];
    if let Some(tier) = user.tier() {
        lines.push(kv("Tier", format!("{}{}", "★".repeat(tier.min(3) as usize), "☆".repeat(3 - tier.min(3) as usize))));
    }
    for &(key, title, fields) in SECTIONS {
        let Some(section) = user.block(key) else {
            continue;
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )));
        for &(name, field_label) in fields {
            lines.push(kv(field_label, section.get(name).map(display_value).unwrap_or_default()));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(p, area);
}

type Section = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

/// Opaque blocks shown below the summary, in display order.
const SECTIONS: &[Section] = &[
    (
        "accountDetails",
        "Account",
        &[("accountNumber", "Account no."), ("bankName", "Bank"), ("balance", "Balance")],
    ),
    (
        "educationAndEmployment",
        "Education and Employment",
        &[
            ("levelOfEducation", "Education"),
            ("employmentStatus", "Employment"),
            ("sectorOfEmployment", "Sector"),
            ("durationOfEmployment", "Duration"),
            ("officeEmail", "Office email"),
            ("monthlyIncome", "Monthly income"),
            ("loanRepayment", "Loan repayment"),
        ],
    ),
    (
        "socials",
        "Socials",
        &[("twitter", "Twitter"), ("facebook", "Facebook"), ("instagram", "Instagram")],
    ),
    (
        "guarantor",
        "Guarantor",
        &[("fullName", "Full name"), ("phoneNumber", "Phone number"), ("email", "Email"), ("relationship", "Relationship")],
    ),
    (
        "secondGuarantor",
        "Second Guarantor",
        &[("fullName", "Full name"), ("phoneNumber", "Phone number"), ("email", "Email"), ("relationship", "Relationship")],
    ),
];

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(" - "),
        other => other.to_string(),
    }
}
