use ratatui::layout::Constraint;
use ratatui::prelude::{Direction, Layout, Rect};

pub(super) const CARD_WIDTH: u16 = 7;
pub(super) const CARD_HEIGHT: u16 = 5;
// Horizontal and vertical offset between neighbouring cards in the pile
const FAN_STEP: u16 = 4;
const ROW_STEP: u16 = 3;

pub(super) fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Lay out the newest `count` cards of a pile as overlapping rows.
///
/// Returns `(first, slots)`: the index of the oldest card that still fits and
/// one rect per visible card, oldest first so later cards render on top.
/// An area smaller than a single card yields no slots.
pub(super) fn fan(area: Rect, count: usize) -> (usize, Vec<Rect>) {
    if area.width < CARD_WIDTH || area.height < CARD_HEIGHT || count == 0 {
        return (count, Vec::new());
    }
    let per_row = usize::from((area.width - CARD_WIDTH) / FAN_STEP + 1);
    let rows = usize::from((area.height - CARD_HEIGHT) / ROW_STEP + 1);
    let capacity = per_row * rows;
    // keep whole rows so cards do not hop sideways as the pile grows
    let first = count.saturating_sub(capacity).div_ceil(per_row) * per_row;
    let slots = (first..count)
        .map(|i| {
            let j = i - first;
            let col = (j % per_row) as u16;
            let top = (j / per_row) as u16 * ROW_STEP;
            // stagger alternate cards by a line to suggest a loose pile
            let stagger = if top + 1 + CARD_HEIGHT <= area.height { col % 2 } else { 0 };
            Rect {
                x: area.x + col * FAN_STEP,
                y: area.y + top + stagger,
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            }
        })
        .collect();
    (first, slots)
}
