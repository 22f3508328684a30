use std::collections::BTreeMap;

use client_core::{
    forms::FormField,
    notify::{Notification, NotificationLevel},
};
use shared::{
    domain::Person,
    protocol::{HairColorPercentage, NationalityEyeColorCount, PageMeta},
};
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

const HEADER: [&str; 11] = [
    "ID",
    "Name",
    "X",
    "Y",
    "Created",
    "Height",
    "Weight",
    "Hair",
    "Eyes",
    "Nationality",
    "Location",
];

fn row(person: &Person) -> [String; 11] {
    [
        person.id.to_string(),
        person.name.clone(),
        person.coordinates.x.to_string(),
        person.coordinates.y.to_string(),
        person.creation_date_label(),
        person.height_label(),
        person.weight.to_string(),
        person.hair_color.to_string(),
        person.eye_color.to_string(),
        person.nationality.to_string(),
        person.location_label(),
    ]
}

/// Prints persons as an aligned table. A zero `total_pages` skips the footer.
pub fn print_page(persons: &[Person], meta: PageMeta) {
    if persons.is_empty() {
        println!("No persons found");
    } else {
        let rows: Vec<[String; 11]> = persons.iter().map(row).collect();
        let mut widths = HEADER.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        print_line(HEADER.iter().copied(), &widths);
        for row in &rows {
            print_line(row.iter().map(String::as_str), &widths);
        }
    }

    if meta.total_pages > 0 {
        let mut footer = format!("page {} of {}", meta.current_page.saturating_add(1), meta.total_pages);
        if let Some(count) = meta.total_count {
            footer.push_str(&format!(", {count} total"));
        }
        println!("{footer}");
    }
}

fn print_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  ").trim_end());
}

pub fn print_hair_color_stats(stats: &HairColorPercentage) {
    println!(
        "hair color {}: {:.2}% ({} of {})",
        stats.hair_color, stats.percentage, stats.color_count, stats.total_count
    );
}

pub fn print_eye_color_stats(stats: &NationalityEyeColorCount) {
    println!(
        "{} with eye color {}: {} of {}",
        stats.nationality, stats.eye_color, stats.eye_color_count, stats.total_nationality_count
    );
}

pub fn print_field_errors(errors: &BTreeMap<FormField, String>) {
    for (field, message) in errors {
        eprintln!("  {field}: {message}");
    }
}

/// Writes every queued notification to stderr.
pub fn print_notifications(rx: &mut Receiver<Notification>) {
    loop {
        match rx.try_recv() {
            Ok(notification) => {
                let tag = match notification.level {
                    NotificationLevel::Info => "info",
                    NotificationLevel::Success => "ok",
                    NotificationLevel::Warning => "warning",
                    NotificationLevel::Error => "error",
                };
                eprintln!("[{tag}] {}", notification.message);
            }
            Err(TryRecvError::Lagged(skipped)) => {
                eprintln!("[warning] {skipped} notifications dropped");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
