use crate::ir::{Entry, Funnel, Phase};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^funnel\s*$").unwrap());
static PHASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^phase\s+(?P<name>.*?)\s*(?:\[(?P<url>[^\]]*)\])?\s*$").unwrap());
static ENTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^entry\s+(?P<rest>.*)$").unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON funnel: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSON5 funnel: {0}")]
    Json5(#[from] json5::Error),
    #[error("line {line}: entry outside of a phase")]
    EntryOutsidePhase { line: usize },
    #[error("line {line}: invalid font size `{value}`")]
    InvalidFontSize { line: usize, value: String },
    #[error("line {line}: unrecognized statement `{text}`")]
    UnknownStatement { line: usize, text: String },
}

/// Parses a funnel from JSON, JSON5, or the line-oriented text format.
pub fn parse_funnel(input: &str) -> Result<Funnel, ParseError> {
    let input = input.trim_start_matches('\u{feff}');
    let trimmed = input.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return parse_json(input);
    }
    parse_text(input)
}

fn parse_json(input: &str) -> Result<Funnel, ParseError> {
    match serde_json::from_str::<Funnel>(input) {
        Ok(funnel) => Ok(funnel),
        Err(json_err) => match json5::from_str::<Funnel>(input) {
            Ok(funnel) => Ok(funnel),
            // strict JSON errors are more precise for inputs that are meant as JSON
            Err(_) if !looks_like_json5(input) => Err(ParseError::Json(json_err)),
            Err(err) => Err(ParseError::Json5(err)),
        },
    }
}

fn looks_like_json5(input: &str) -> bool {
    input.contains("//") || input.contains("/*") || input.contains('\'') || {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        compact.contains(",]") || compact.contains(",}")
    }
}

fn parse_text(input: &str) -> Result<Funnel, ParseError> {
    let mut phases: Vec<Phase> = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("%%") || HEADER_RE.is_match(line) {
            continue;
        }

        if let Some(caps) = PHASE_RE.captures(line) {
            let name = caps.name("name").map(|m| m.as_str()).unwrap_or("");
            let url = caps
                .name("url")
                .map(|m| m.as_str().trim().to_string())
                .filter(|url| !url.is_empty());
            phases.push(Phase {
                name: name.to_string(),
                entries: Vec::new(),
                url,
            });
            continue;
        }

        if let Some(caps) = ENTRY_RE.captures(line) {
            let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
            let entry = parse_entry(rest, line_no)?;
            let phase = phases
                .last_mut()
                .ok_or(ParseError::EntryOutsidePhase { line: line_no })?;
            phase.entries.push(entry);
            continue;
        }

        return Err(ParseError::UnknownStatement {
            line: line_no,
            text: line.to_string(),
        });
    }

    Ok(Funnel::new(phases))
}

// `entry <name> | <url> | <font size>`, url and font size optional.
fn parse_entry(rest: &str, line_no: usize) -> Result<Entry, ParseError> {
    let mut parts = rest.splitn(3, '|').map(str::trim);
    let name = parts.next().unwrap_or("");
    let url = parts.next().unwrap_or("");
    let font_size = match parts.next().filter(|value| !value.is_empty()) {
        Some(value) => Some(value.trim_end_matches("px").trim().parse::<f32>().map_err(
            |_| ParseError::InvalidFontSize {
                line: line_no,
                value: value.to_string(),
            },
        )?),
        None => None,
    };
    Ok(Entry {
        name: name.to_string(),
        url: url.to_string(),
        font_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = r#"
funnel
%% marketing funnel
phase Awareness [https://example.com/awareness]
  entry Blog post | https://example.com/blog | 28
  entry Newsletter | https://example.com/news
phase Purchase
  entry Checkout | https://example.com/buy | 16px
"#;

    #[test]
    fn parses_text_format() {
        let funnel = parse_funnel(TEXT).unwrap();
        assert_eq!(funnel.len(), 2);
        let awareness = &funnel.phases[0];
        assert_eq!(awareness.name, "Awareness");
        assert_eq!(awareness.url.as_deref(), Some("https://example.com/awareness"));
        assert_eq!(awareness.entries.len(), 2);
        assert_eq!(awareness.entries[0].name, "Blog post");
        assert_eq!(awareness.entries[0].font_size, Some(28.0));
        assert_eq!(awareness.entries[1].font_size, None);
        assert_eq!(funnel.phases[1].url, None);
        assert_eq!(funnel.phases[1].entries[0].font_size, Some(16.0));
    }

    #[test]
    fn text_json_and_json5_agree() {
        let json = r#"{"phases": [
            {"name": "Awareness", "url": "https://example.com/awareness", "entries": [
                {"name": "Blog post", "url": "https://example.com/blog", "fontSize": 28},
                {"name": "Newsletter", "url": "https://example.com/news"}
            ]},
            {"name": "Purchase", "entries": [
                {"name": "Checkout", "url": "https://example.com/buy", "fontSize": 16}
            ]}
        ]}"#;
        let json5 = r#"[
            // trailing commas and comments are fine here
            {name: 'Awareness', url: 'https://example.com/awareness', entries: [
                {name: 'Blog post', url: 'https://example.com/blog', fontSize: 28},
                {name: 'Newsletter', url: 'https://example.com/news'},
            ]},
            {name: 'Purchase', entries: [
                {name: 'Checkout', url: 'https://example.com/buy', fontSize: 16},
            ]},
        ]"#;
        let from_text = parse_funnel(TEXT).unwrap();
        assert_eq!(parse_funnel(json).unwrap(), from_text);
        assert_eq!(parse_funnel(json5).unwrap(), from_text);
    }

    #[test]
    fn entry_before_phase_is_an_error() {
        let err = parse_funnel("funnel\nentry Orphan | https://x").unwrap_err();
        assert!(matches!(err, ParseError::EntryOutsidePhase { line: 2 }));
    }

    #[test]
    fn bad_font_size_reports_line() {
        let err = parse_funnel("phase A\nentry x | https://x | huge").unwrap_err();
        assert!(matches!(err, ParseError::InvalidFontSize { line: 2, .. }));
        assert_eq!(err.to_string(), "line 2: invalid font size `huge`");
    }

    #[test]
    fn line_numbers_count_leading_blank_lines() {
        let err = parse_funnel("\n\nentry x").unwrap_err();
        assert!(matches!(err, ParseError::EntryOutsidePhase { line: 3 }));
    }

    #[test]
    fn unknown_statement_is_rejected() {
        let err = parse_funnel("phase A\nstage B").unwrap_err();
        assert!(matches!(err, ParseError::UnknownStatement { line: 2, .. }));
    }

    #[test]
    fn empty_input_is_an_empty_funnel() {
        assert!(parse_funnel("").unwrap().is_empty());
        assert!(parse_funnel("funnel\n").unwrap().is_empty());
        assert!(parse_funnel("[]").unwrap().is_empty());
    }

    #[test]
    fn entry_without_url_degrades_to_empty_url() {
        let funnel = parse_funnel("phase A\nentry Lonely").unwrap();
        assert_eq!(funnel.phases[0].entries[0], Entry::new("Lonely", ""));
    }

    #[test]
    fn malformed_json_reports_json_error() {
        assert!(matches!(parse_funnel("[{\"name\": }]"), Err(ParseError::Json(_))));
    }

    #[test]
    fn json_type_errors_keep_their_position() {
        let input = "\n[\n  {\"name\": \"Lead\", \"entries\": [\n    {\"name\": \"a\", \"fontSize\": \"big\"}\n  ]}\n]";
        match parse_funnel(input) {
            Err(ParseError::Json(err)) => {
                assert_eq!(err.line(), 4);
                assert!(err.column() > 0);
                assert!(err.to_string().contains("line 4"), "{err}");
            }
            other => panic!("expected a positioned JSON error, got {other:?}"),
        }
        let wrapped = "{\"phases\": [\n  {\"name\": 7}\n]}";
        match parse_funnel(wrapped) {
            Err(ParseError::Json(err)) => assert_eq!(err.line(), 2),
            other => panic!("expected a positioned JSON error, got {other:?}"),
        }
    }
}
