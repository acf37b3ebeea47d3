use flanker::{
    block::BlockPhase,
    instructions::{Exhibit, Screen},
    summary::ConditionSummary,
    trial::{Direction, DirectionCode, StimulusKind, TrialSpec},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;

const FISH_LEFT: &str = "<':::><";
const FISH_RIGHT: &str = "><:::'>";
const ARROW_LEFT: &str = "<------";
const ARROW_RIGHT: &str = "------>";
const SLOT_GAP: &str = "   ";

fn slot_art(kind: StimulusKind, direction: Direction) -> &'static str {
    match (kind, direction) {
        (StimulusKind::Fish, Direction::Left) => FISH_LEFT,
        (StimulusKind::Fish, Direction::Right) => FISH_RIGHT,
        (StimulusKind::Arrow, Direction::Left) => ARROW_LEFT,
        (StimulusKind::Arrow, Direction::Right) => ARROW_RIGHT,
    }
}

/// The five-slot row for a trial, narrowing to bare glyphs when the
/// terminal cannot fit the full art.
fn stimulus_row(kind: StimulusKind, code: DirectionCode, max_width: u16) -> String {
    let wide: String = code
        .layout()
        .iter()
        .map(|d| slot_art(kind, *d))
        .collect::<Vec<_>>()
        .join(SLOT_GAP);
    if wide.width() <= max_width as usize {
        return wide;
    }
    code.layout()
        .iter()
        .map(|d| match d {
            Direction::Left => "<",
            Direction::Right => ">",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Instructions => render_instructions(self, area, buf),
            AppState::Trials => render_trial(self, area, buf),
            AppState::Debrief => render_debrief(self, area, buf),
        }
    }
}

fn centered_chunks(area: Rect, content_height: u16, footer: bool) -> (Rect, Rect) {
    let footer_lines = if footer { 2 } else { 0 };
    let top = (area.height.saturating_sub(content_height + footer_lines)) / 2;
    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(content_height),
            Constraint::Min(0),
            Constraint::Length(footer_lines),
        ])
        .split(area);
    (chunks[1], chunks[3])
}

fn render_instructions(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(screen) = app.deck.current() else {
        return;
    };

    let text_lines = screen.text.lines().count() as u16;
    let exhibit_lines = match screen.exhibit {
        Exhibit::None => 0,
        Exhibit::SingleFish => 3,
        Exhibit::FishRow(_) => 3,
    };
    let (content, footer) = centered_chunks(area, text_lines + exhibit_lines, true);

    let sections = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(text_lines),
            Constraint::Length(exhibit_lines),
        ])
        .split(content);

    Paragraph::new(screen.text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(sections[0], buf);

    render_exhibit(screen, sections[1], buf);

    let (shown, total) = app.deck.progress();
    Paragraph::new(Line::from(vec![
        Span::styled(
            "press SPACE to continue",
            Style::default()
                .add_modifier(Modifier::DIM | Modifier::ITALIC),
        ),
        Span::styled(
            format!("  ({}/{})", shown, total),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]))
    .alignment(Alignment::Center)
    .render(footer, buf);
}

fn render_exhibit(screen: &Screen, area: Rect, buf: &mut Buffer) {
    let art = match screen.exhibit {
        Exhibit::None => return,
        Exhibit::SingleFish => FISH_RIGHT.to_string(),
        Exhibit::FishRow(code) => stimulus_row(
            StimulusKind::Fish,
            code,
            area.width.saturating_sub(HORIZONTAL_MARGIN * 2),
        ),
    };
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            art,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_trial(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(runner) = app.block.as_ref() else {
        return;
    };
    let (content, _) = centered_chunks(area, 1, false);

    match (runner.phase(), runner.current_spec()) {
        (BlockPhase::Fixation, _) => {
            Paragraph::new(Span::styled(
                "+",
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(content, buf);
        }
        (BlockPhase::Stimulus, Some(spec)) => {
            render_stimulus(spec, content, buf);
        }
        // Between trials or after the block: blank frame
        _ => {}
    }
}

fn render_stimulus(spec: &TrialSpec, area: Rect, buf: &mut Buffer) {
    let row = stimulus_row(spec.stimulus_kind, spec.direction_code, area.width);
    Paragraph::new(Span::styled(
        row,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_debrief(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled(
            "All done. Thank you!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    for s in &app.summary {
        lines.push(Line::from(summary_line(s)));
    }
    if app.summary.is_empty() {
        lines.push(Line::from(Span::styled(
            "no trials recorded",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let (content, footer) = centered_chunks(area, lines.len() as u16, true);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(content, buf);

    Paragraph::new(Span::styled(
        "press SPACE to finish",
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(footer, buf);
}

fn summary_line(s: &ConditionSummary) -> String {
    match (s.mean_rt_ms, s.rt_std_dev_ms) {
        (Some(mean), Some(sd)) => format!(
            "{:<12} {:>2}/{} correct ({:.0}%)   mean RT {:.0} ms (sd {:.0})",
            s.condition, s.correct, s.trials, s.accuracy, mean, sd
        ),
        _ => format!(
            "{:<12} {:>2}/{} correct ({:.0}%)   no responses",
            s.condition, s.correct, s.trials, s.accuracy
        ),
    }
}
