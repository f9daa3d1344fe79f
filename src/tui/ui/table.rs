use crate::cards::DealtCard;
use crate::tui::app::{AppState, InputAction};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, fan, inner};

pub(super) fn draw_table(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(7),    // pile
            Constraint::Length(5), // status bar
        ])
        .split(size);

    let view = app.view();
    let mut header_lines: Vec<Line> = Vec::new();
    match view.deck.as_ref() {
        Some(deck) => {
            header_lines.push(Line::from(format!(
                "Deck: {}   Remaining: {}   Drawn: {}",
                deck.deck_id(),
                deck.remaining(),
                deck.drawn().len()
            )));
        }
        None if app.busy() => header_lines.push(Line::from("Dealing a new deck...")),
        None => header_lines.push(Line::from("No deck yet. Press N to deal one.")),
    }
    let dealer = if view.is_busy() {
        Span::styled("Dealer: busy", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Dealer: idle", Style::default().add_modifier(Modifier::DIM))
    };
    header_lines.push(Line::from(dealer));
    let header = Paragraph::new(header_lines)
        .block(Block::default().title("Click to Draw!").borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    draw_pile(f, chunks[1], view.drawn());
    draw_status(f, chunks[2], app);
}

fn draw_pile(f: &mut Frame, area: Rect, drawn: &[DealtCard]) {
    let block = Block::default().title(format!("Drawn cards ({})", drawn.len())).borders(Borders::ALL);
    f.render_widget(block, area);
    let pile_area = inner(area);
    if drawn.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "No cards drawn.",
            Style::default().add_modifier(Modifier::DIM),
        )))
        .alignment(Alignment::Center);
        f.render_widget(hint, pile_area);
        return;
    }
    let (first, slots) = fan(pile_area, drawn.len());
    if slots.is_empty() {
        // too small for card faces; fall back to a line of codes
        let text: Vec<String> = drawn.iter().map(|c| c.to_string()).collect();
        f.render_widget(Paragraph::new(text.join(" ")).wrap(Wrap { trim: true }), pile_area);
        return;
    }
    let newest = drawn.len() - 1;
    for (i, slot) in (first..).zip(slots) {
        let border = if i == newest { Some(Color::Yellow) } else { None };
        render_card_widget(f, slot, &drawn[i], border);
    }
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let status_inner = inner(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(status_inner);

    let enabled = !app.busy();
    let action_style = |enabled: bool| {
        if enabled {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    };
    let pending = app.pending_action();
    let label = |action: InputAction, idle: &'static str, working: &'static str| {
        if pending == Some(action) {
            working
        } else {
            idle
        }
    };
    let mut left_info = vec![Line::from(vec![
        Span::raw("Actions: "),
        Span::styled(label(InputAction::Draw, "D draw card", "Drawing..."), action_style(enabled)),
        Span::raw(" • "),
        Span::styled(
            label(InputAction::Shuffle, "S shuffle deck", "Shuffling..."),
            action_style(enabled),
        ),
        Span::raw(" • "),
        Span::styled(label(InputAction::NewDeck, "N new deck", "Dealing..."), action_style(enabled)),
    ])];

    if let Some(notice) = app.notice() {
        let style =
            if notice.is_error { Style::default().fg(Color::Red) } else { Style::default().fg(Color::Green) };
        left_info.push(Line::from(Span::styled(notice.text.clone(), style)));
    }
    if let Some(last) = app.view().drawn().last() {
        left_info.push(Line::from(Span::styled(
            format!("Image: {}", last.image_ref),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let right_keys = vec![Line::from(""), Line::from("? help • Q quit")];
    let left_para = Paragraph::new(left_info).wrap(Wrap { trim: true });
    let right_para = Paragraph::new(right_keys).wrap(Wrap { trim: true }).alignment(Alignment::Right);
    f.render_widget(left_para, cols[0]);
    f.render_widget(right_para, cols[1]);
}

pub(super) fn draw_help(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let lines = vec![
        Line::from(Span::styled("Deck:", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("- D / Space / Enter: draw a card"),
        Line::from("- S: return all cards and shuffle"),
        Line::from("- N: deal a new deck"),
        Line::from(""),
        Line::from("Actions are disabled while the dealer is answering."),
        Line::from(""),
        Line::from("- Q / Esc: quit"),
        Line::from("Close help: ? or Esc"),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(para, inner(area));
}

fn suit_style(card: &DealtCard) -> Style {
    if card.card.suit().is_red() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_card_widget(f: &mut Frame, area: Rect, card: &DealtCard, border: Option<Color>) {
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(color) = border {
        block = block.border_style(Style::default().fg(color));
    }
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    let style = suit_style(card);
    let face = card.card;
    let lines = vec![
        Line::from(Span::styled(face.rank().label(), style)),
        Line::from(Span::styled(face.suit().glyph().to_string(), style)).alignment(Alignment::Center),
        Line::from(Span::styled(face.rank().label(), style)).alignment(Alignment::Right),
    ];
    f.render_widget(Paragraph::new(lines), inner(area));
}
