use crate::plugins::{
    CalculationRecord, DefinitionRecord, ExecutionResult, Payload, PresentationHint,
    WeatherRecord,
};
use crate::utils::text::{display_width, pad_to_width, truncate_to_width, wrap_text};

use console::style;

const MIN_CARD_WIDTH: usize = 32;
const MAX_CARD_WIDTH: usize = 72;

/// Card width for the current terminal.
pub fn card_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    terminal_width
        .saturating_sub(4)
        .clamp(MIN_CARD_WIDTH, MAX_CARD_WIDTH)
}

/// Draws `lines` in a box `width` columns wide with `title` in the top
/// border. Lines are wrapped to fit.
pub fn boxed(title: &str, lines: &[String], width: usize) -> String {
    let width = width.max(MIN_CARD_WIDTH);
    let inner = width - 4;

    let title = truncate_to_width(title, width.saturating_sub(6));
    let top = format!(
        "┌─ {} {}┐",
        title,
        "─".repeat(width.saturating_sub(display_width(&title) + 5))
    );
    let bottom = format!("└{}┘", "─".repeat(width - 2));

    let mut out = vec![style(top).dim().cyan().to_string()];
    for line in lines {
        for wrapped in wrap_preserving_indent(line, inner) {
            out.push(format!(
                "{} {} {}",
                style("│").dim().cyan(),
                pad_to_width(&wrapped, inner),
                style("│").dim().cyan()
            ));
        }
    }
    out.push(style(bottom).dim().cyan().to_string());
    out.join("\n")
}

fn wrap_preserving_indent(line: &str, width: usize) -> Vec<String> {
    if display_width(line) <= width {
        return vec![line.to_string()];
    }

    let indent = &line[..line.len() - line.trim_start().len()];
    let indent_width = display_width(indent);
    if indent_width * 2 >= width {
        return wrap_text(line, width);
    }

    wrap_text(line.trim_start(), width - indent_width)
        .into_iter()
        .map(|wrapped| format!("{}{}", indent, wrapped))
        .collect()
}

fn weather_lines(record: &WeatherRecord) -> Vec<String> {
    vec![
        record.location.clone(),
        format!("{}°C  {}", record.temperature_celsius, record.condition),
        format!("Humidity: {}%", record.humidity_percent),
        format!("Wind: {} km/h", record.wind_speed_kph),
    ]
}

/// `f64`'s `Display` form: `14.0` prints as `14`, `0.3` as `0.3`.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn calculation_lines(record: &CalculationRecord) -> Vec<String> {
    vec![
        record.expression.clone(),
        format!("Result: {}", format_number(record.result)),
    ]
}

fn definition_lines(record: &DefinitionRecord) -> Vec<String> {
    let mut lines = vec![match &record.pronunciation {
        Some(pronunciation) => format!("{}  {}", record.word, pronunciation),
        None => record.word.clone(),
    }];

    let mut current_part: Option<&str> = None;
    let mut index = 0;
    for sense in &record.senses {
        if current_part != Some(sense.part_of_speech.as_str()) {
            lines.push(String::new());
            lines.push(sense.part_of_speech.clone());
            current_part = Some(sense.part_of_speech.as_str());
            index = 0;
        }
        index += 1;
        lines.push(format!("  {}. {}", index, sense.definition));
        if let Some(example) = &sense.example {
            lines.push(format!("     \"{}\"", example));
        }
    }
    lines
}

fn payload_lines(payload: &Payload) -> Vec<String> {
    match payload {
        Payload::Weather(record) => weather_lines(record),
        Payload::Calculation(record) => calculation_lines(record),
        Payload::Definition(record) => definition_lines(record),
    }
}

/// Renders one plugin result. Cards are boxed; text results and failures
/// are plain lines.
pub fn render_result(plugin_name: &str, result: &ExecutionResult, width: usize) -> String {
    match result.payload() {
        Some(payload) => match result.presentation {
            PresentationHint::Card => boxed(plugin_name, &payload_lines(payload), width),
            _ => payload_lines(payload)
                .into_iter()
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        },
        None => format!(
            "{} {}",
            style(format!("[{}]", plugin_name)).bold().red(),
            result.error_message().unwrap_or_default()
        ),
    }
}

pub fn print_result(plugin_name: &str, result: &ExecutionResult) {
    println!("{}", render_result(plugin_name, result, card_width()));
}

pub fn print_reply(reply: &str) {
    println!("{} {}", style("neochat>").bold().magenta(), reply);
}

pub fn print_info(text: &str) {
    println!("{}", text);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("error:").bold().red(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{FailureKind, Sense};

    fn plain(rendered: &str) -> String {
        console::strip_ansi_codes(rendered).into_owned()
    }

    #[test]
    fn weather_card_has_all_fields() {
        let result = ExecutionResult::card(Payload::Weather(WeatherRecord {
            location: "Paris".into(),
            temperature_celsius: 18,
            condition: "Cloudy".into(),
            humidity_percent: 64,
            wind_speed_kph: 11,
            icon_id: "04d".into(),
        }));

        let card = plain(&render_result("weather", &result, 40));
        assert!(card.starts_with("┌─ weather "));
        assert!(card.contains("18°C  Cloudy"));
        assert!(card.contains("Humidity: 64%"));
        assert!(card.contains("Wind: 11 km/h"));
        for line in card.lines() {
            assert_eq!(display_width(line), 40, "line: {line:?}");
        }
    }

    #[test]
    fn calculation_card_prints_whole_numbers_plainly() {
        let result = ExecutionResult::card(Payload::Calculation(CalculationRecord {
            expression: "2 * (3 + 4)".into(),
            result: 14.0,
        }));

        let card = plain(&render_result("calculator", &result, 40));
        assert!(card.contains("Result: 14 "));
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(0.3), "0.3");
        assert_eq!(format_number(-2.5), "-2.5");
    }

    #[test]
    fn definition_card_groups_senses() {
        let result = ExecutionResult::card(Payload::Definition(DefinitionRecord {
            word: "run".into(),
            pronunciation: Some("/rʌn/".into()),
            senses: vec![
                Sense {
                    part_of_speech: "verb".into(),
                    definition: "Move at a speed faster than a walk.".into(),
                    example: Some("she ran off".into()),
                },
                Sense {
                    part_of_speech: "verb".into(),
                    definition: "Pass or cause to pass quickly.".into(),
                    example: None,
                },
                Sense {
                    part_of_speech: "noun".into(),
                    definition: "An act of running.".into(),
                    example: None,
                },
            ],
        }));

        let card = plain(&render_result("dictionary", &result, 60));
        assert!(card.contains("run  /rʌn/"));
        assert!(card.contains("  1. Move at a speed faster than a walk."));
        assert!(card.contains("  2. Pass or cause to pass quickly."));
        assert!(card.contains("  1. An act of running."));
        assert!(card.contains("\"she ran off\""));
    }

    #[test]
    fn short_lines_keep_their_spacing() {
        let result = ExecutionResult::card(Payload::Calculation(CalculationRecord {
            expression: "2  +  2".into(),
            result: 4.0,
        }));

        let card = plain(&render_result("calculator", &result, 40));
        assert!(card.contains("│ 2  +  2 "));
    }

    #[test]
    fn long_lines_wrap_inside_the_box() {
        let lines = vec![format!("  1. {}", "word ".repeat(30))];
        let card = plain(&boxed("dictionary", &lines, 40));

        assert!(card.lines().count() > 3);
        for line in card.lines() {
            assert_eq!(display_width(line), 40);
        }
    }

    #[test]
    fn failures_render_as_text() {
        let result = ExecutionResult::failure(FailureKind::MissingArgument, "Please specify a city name");
        let text = plain(&render_result("weather", &result, 40));
        assert_eq!(text, "[weather] Please specify a city name");
    }
}
