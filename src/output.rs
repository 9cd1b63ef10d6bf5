//! Rendering of lookup results as text, JSON or YAML

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::data::{DivisionId, LegislatorField, MatchedRepresentative, Role};
use crate::resolver::Resolution;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Errors that can occur while serializing output
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Machine-readable lookup result
#[derive(Debug, Serialize)]
struct Report<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    divisions: Option<&'a [DivisionId]>,
    representatives: &'a [MatchedRepresentative],
}

impl<'a> From<&'a Resolution> for Report<'a> {
    fn from(resolution: &'a Resolution) -> Self {
        let (status, divisions) = match resolution {
            Resolution::Found(_) => ("found", None),
            Resolution::NoDistricts => ("no_districts", None),
            Resolution::NoMatches { divisions } => ("no_matches", Some(divisions.as_slice())),
        };
        Report {
            status,
            divisions,
            representatives: resolution.representatives(),
        }
    }
}

/// Renders a resolution in the requested format
pub fn render(resolution: &Resolution, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Text => Ok(render_text(resolution)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&Report::from(resolution))?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&Report::from(resolution))?),
    }
}

fn render_text(resolution: &Resolution) -> String {
    match resolution {
        Resolution::NoDistricts => "No congressional districts found.\n".to_string(),
        Resolution::NoMatches { divisions } => {
            let mut out = String::from("No legislators found for:\n");
            for division in divisions {
                out.push_str(&format!("  {}\n", division));
            }
            out
        }
        Resolution::Found(reps) => {
            let mut out = String::new();
            for (role, heading) in [(Role::Senator, "Senators:"), (Role::Representative, "Representatives:")] {
                let group: Vec<_> = reps.iter().filter(|r| r.role == role).collect();
                if group.is_empty() {
                    continue;
                }
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(heading);
                out.push('\n');
                for rep in group {
                    out.push_str(&format!("  • {}\n", text_line(rep)));
                }
            }
            out
        }
    }
}

/// `Name (Party) - CA-12, Delegate`, omitting whatever was filtered out
fn text_line(rep: &MatchedRepresentative) -> String {
    let mut line = display_name(rep);

    if let Some(party) = rep.get_str(LegislatorField::Party) {
        line.push_str(&format!(" ({})", party));
    }
    if let Some(label) = seat_label(rep) {
        line.push_str(&format!(" - {}", label));
    }
    if let Some(title) = rep.get_str(LegislatorField::Title) {
        if title != "Senator" && title != "Representative" {
            line.push_str(&format!(", {}", title));
        }
    }
    line
}

fn display_name(rep: &MatchedRepresentative) -> String {
    if let Some(full) = rep.get_str(LegislatorField::FullName) {
        return full.to_string();
    }
    let parts: Vec<&str> = [LegislatorField::FirstName, LegislatorField::LastName]
        .into_iter()
        .filter_map(|f| rep.get_str(f))
        .collect();
    if parts.is_empty() {
        "Unknown".to_string()
    } else {
        parts.join(" ")
    }
}

fn seat_label(rep: &MatchedRepresentative) -> Option<String> {
    let state = rep.get_str(LegislatorField::State)?;
    match (rep.role, rep.get(LegislatorField::District).and_then(|v| v.as_u64())) {
        (Role::Representative, Some(0)) => Some(format!("{}-AL", state)),
        (Role::Representative, Some(n)) => Some(format!("{}-{}", state, n)),
        _ => Some(state.to_string()),
    }
}
