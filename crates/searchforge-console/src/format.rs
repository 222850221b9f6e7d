//! Line formatting for solver events.

use std::fmt;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::Level;

/// Fields of one solver record that the console knows how to show.
#[derive(Debug, Default)]
pub(crate) struct EventVisitor {
    pub(crate) event: Option<String>,
    pub(crate) phase: Option<String>,
    pub(crate) score: Option<String>,
    pub(crate) best: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) phases: Option<u64>,
    pub(crate) phase_index: Option<u64>,
    pub(crate) step: Option<u64>,
    pub(crate) steps: Option<u64>,
    pub(crate) speed: Option<u64>,
    pub(crate) moves: Option<u64>,
    pub(crate) improvements: Option<u64>,
    pub(crate) duration_ms: Option<u64>,
    pub(crate) entity_count: Option<u64>,
    pub(crate) value_count: Option<u64>,
    pub(crate) terminated_early: Option<bool>,
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "phase" => self.phase = Some(value),
            "score" => self.score = Some(value),
            "best" => self.best = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{value:?}").trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phases" => self.phases = Some(value),
            "phase_index" => self.phase_index = Some(value),
            "step" => self.step = Some(value),
            "steps" => self.steps = Some(value),
            "speed" => self.speed = Some(value),
            "moves" => self.moves = Some(value),
            "improvements" => self.improvements = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "entity_count" => self.entity_count = Some(value),
            "value_count" => self.value_count = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let Ok(value) = u64::try_from(value) {
            self.record_u64(field, value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }
}

/// Renders a record, or `None` for records the console does not show.
pub(crate) fn format_event(v: &EventVisitor, level: Level, elapsed_secs: f64) -> Option<String> {
    let elapsed = format!("{elapsed_secs:>7.3}s").bright_black().to_string();
    let line = match v.event.as_deref()? {
        "solve_start" => format_solve_start(v, &elapsed),
        "phase_start" => format_phase_start(v, &elapsed),
        "new_best" => format_new_best(v),
        "step" if level == Level::DEBUG => format_step(v, &elapsed),
        "phase_end" => format_phase_end(v, &elapsed),
        "solve_end" => format_solve_end(v, &elapsed),
        "solve_error" => format!(
            "{elapsed} {} Solving failed │ {}",
            "✗".bright_red().bold(),
            v.error.as_deref().unwrap_or("unknown error").bright_red()
        ),
        "unbounded_phase" => format!(
            "{elapsed} {} Phase ({}) has no termination and runs until stopped",
            "!".bright_yellow().bold(),
            v.phase_index.unwrap_or(0).yellow()
        ),
        _ => return None,
    };
    Some(line)
}

fn format_solve_start(v: &EventVisitor, elapsed: &str) -> String {
    let entities = v.entity_count.unwrap_or(0);
    let values = v.value_count.unwrap_or(0);

    format!(
        "{elapsed} {} Solving │ {} entities │ {} values │ scale {} │ {} phases │ {}",
        "▶".bright_green().bold(),
        entities.to_formatted_string(&Locale::en).bright_yellow(),
        values.to_formatted_string(&Locale::en).bright_yellow(),
        problem_scale(entities, values).bright_magenta(),
        v.phases.unwrap_or(0),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_phase_start(v: &EventVisitor, elapsed: &str) -> String {
    format!(
        "{elapsed} {} {} ({}) started │ {}",
        "▶".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
        v.phase_index.unwrap_or(0).yellow(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    format!(
        "    {} Step {:>7} │ {}",
        "->".bright_blue(),
        v.step.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_step(v: &EventVisitor, elapsed: &str) -> String {
    format!(
        "{elapsed} {} Step {:>10} │ {} │ best {}",
        "·".bright_black(),
        v.step.unwrap_or(0).to_formatted_string(&Locale::en).bright_black(),
        v.score.as_deref().unwrap_or("N/A").bright_black(),
        v.best.as_deref().unwrap_or("N/A").bright_black()
    )
}

fn format_phase_end(v: &EventVisitor, elapsed: &str) -> String {
    format!(
        "{elapsed} {} {} ({}) ended │ {} │ {} steps │ {} moves/s │ {} improvements │ {}",
        "◀".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
        v.phase_index.unwrap_or(0).yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.steps.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.speed
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        v.improvements.unwrap_or(0).to_formatted_string(&Locale::en),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_solve_end(v: &EventVisitor, elapsed: &str) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let status = if is_feasible(score) {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{elapsed} {} Solving complete │ {} │ {} │ {} │ {} steps │ {} moves",
        "■".bright_cyan().bold(),
        format_score(score),
        status,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.steps.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.moves.unwrap_or(0).to_formatted_string(&Locale::en).white(),
    );
    if v.terminated_early == Some(true) {
        output.push_str(&format!(" │ {}", "terminated early".yellow()));
    }
    output
}

/// Scores with a hard level are feasible when it is not negative.
fn is_feasible(score: &str) -> bool {
    match score.split('/').next() {
        Some(first) if first.ends_with("hard") => !first.starts_with('-'),
        _ => true,
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

fn format_score(score: &str) -> String {
    if score.contains('/') {
        return score
            .split('/')
            .map(|level| {
                if level.starts_with('-') {
                    if level.ends_with("hard") {
                        level.bright_red().to_string()
                    } else {
                        level.yellow().to_string()
                    }
                } else {
                    level.bright_green().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("/");
    }

    match score.parse::<i64>() {
        Ok(n) if n < 0 => score.bright_red().to_string(),
        Ok(n) if n > 0 => score.bright_green().to_string(),
        _ => score.white().to_string(),
    }
}

/// `value_count ^ entity_count` in scientific notation.
fn problem_scale(entity_count: u64, value_count: u64) -> String {
    if entity_count == 0 || value_count == 0 {
        return "0".to_string();
    }

    let log_scale = (entity_count as f64) * (value_count as f64).log10();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{mantissa:.3} x 10^{exponent}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_events_are_skipped() {
        assert!(format_event(&visitor("best_solution_dropped"), Level::INFO, 0.0).is_none());
        assert!(format_event(&EventVisitor::default(), Level::INFO, 0.0).is_none());
    }

    #[test]
    fn test_step_lines_only_at_debug() {
        let step = EventVisitor {
            step: Some(12),
            score: Some("-3".to_string()),
            best: Some("-2".to_string()),
            ..visitor("step")
        };
        assert!(format_event(&step, Level::TRACE, 0.0).is_none());
        let line = format_event(&step, Level::DEBUG, 0.0).unwrap();
        assert!(line.contains("12"));
        assert!(line.contains("-2"));
    }

    #[test]
    fn test_phase_end_line() {
        let end = EventVisitor {
            phase: Some("LocalSearch".to_string()),
            phase_index: Some(1),
            steps: Some(12_345),
            speed: Some(98_765),
            improvements: Some(7),
            duration_ms: Some(2_500),
            score: Some("0hard/-20soft".to_string()),
            ..visitor("phase_end")
        };
        let line = format_event(&end, Level::INFO, 3.0).unwrap();
        assert!(line.contains("LocalSearch"));
        assert!(line.contains("12,345"));
        assert!(line.contains("98,765"));
        assert!(line.contains("2.50s"));
        assert!(line.contains("-20soft"));
    }

    #[test]
    fn test_solve_end_marks_early_termination() {
        let end = EventVisitor {
            score: Some("-1hard/0soft".to_string()),
            terminated_early: Some(true),
            ..visitor("solve_end")
        };
        let line = format_event(&end, Level::INFO, 1.0).unwrap();
        assert!(line.contains("INFEASIBLE"));
        assert!(line.contains("terminated early"));
    }

    #[test]
    fn test_feasibility_from_score_text() {
        assert!(is_feasible("0hard/-5soft"));
        assert!(is_feasible("0hard/-3medium/-5soft"));
        assert!(!is_feasible("-2hard/0soft"));
        assert!(is_feasible("-12"));
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(450), "450ms");
        assert_eq!(format_duration_ms(1_500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_problem_scale() {
        assert_eq!(problem_scale(0, 10), "0");
        assert_eq!(problem_scale(4, 4), "2.560 x 10^2");
    }
}
