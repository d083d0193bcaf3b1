//! Rendering server answers for the terminal

use serde::Serialize;
use std::fmt::Write;

use crate::http::{Classes, Health, Languages, Prediction};
use crate::OutputFormat;

/// Confidence as a percentage with two decimals, e.g. `70.00%`.
pub fn percent(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

pub fn prediction(p: &Prediction, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return json(p);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<12}{}", "Class:", p.class);
    let _ = writeln!(out, "{:<12}{}", "Confidence:", percent(p.confidence));

    for (title, items) in [
        ("Cause", &p.cause),
        ("Precaution", &p.precaution),
        ("Cure", &p.cure),
    ] {
        let Some(items) = items else { continue };
        let _ = writeln!(out, "\n{}:", title);
        if items.is_empty() {
            let _ = writeln!(out, "  (none)");
        }
        for item in items {
            let _ = writeln!(out, "  - {}", item);
        }
    }
    out
}

pub fn classes(c: &Classes, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return json(c);
    }

    let mut out = String::new();
    for (index, name) in c.classes.iter().enumerate() {
        let _ = writeln!(out, "{:>3}  {}", index, name);
    }
    out
}

pub fn languages(l: &Languages, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return json(l);
    }

    let available = if l.available.is_empty() {
        "(none)".to_string()
    } else {
        l.available.join(", ")
    };
    format!(
        "{:<12}{}\n{:<12}{}\n",
        "Default:", l.default, "Available:", available
    )
}

pub fn health(h: &Health, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return json(h);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<12}{}", "Status:", h.status);
    let _ = writeln!(out, "{:<12}{} ({})", "Backend:", h.backend, h.target);
    let _ = writeln!(out, "{:<12}{}", "Classes:", h.classes);
    let metadata = if h.metadata_enabled {
        h.languages.join(", ")
    } else {
        "disabled".to_string()
    };
    let _ = writeln!(out, "{:<12}{}", "Metadata:", metadata);
    out
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
