use crate::app::{card_label, App};
use crate::celebration::{Celebration, CARD_HEIGHT, CARD_WIDTH};
use klondike_core::{Card, Color as SuitColor, PileRef, FOUNDATION_PILES, TABLEAU_PILES};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    if let Some(celebration) = app.celebration.as_ref() {
        draw_celebration(frame, celebration);
        return;
    }

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_top_row(frame, root[1], app);
    draw_tableau(frame, root[2], app);
    draw_events(frame, root[3], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let summary = format!(
        "Score {} | {} | Seed {} | Stock {} Waste {}",
        app.game.score(),
        app.phase_label(),
        app.seed_label(),
        app.game.board().stock.len(),
        app.game.board().waste.len(),
    );
    let lines = vec![
        Line::from(summary.bold()),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Klondike");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, TABLEAU_PILES as u32); TABLEAU_PILES])
        .split(area)
}

fn draw_top_row(frame: &mut Frame, area: Rect, app: &App) {
    let cols = columns(area);
    let board = app.game.board();

    let stock_line = match (board.stock.is_empty(), board.waste.is_empty()) {
        (false, _) => Line::from(format!("## x{}", board.stock.len())),
        (true, false) => Line::from("(recycle)").dim(),
        (true, true) => Line::from(""),
    };
    draw_pile(frame, cols[0], app, PileRef::STOCK, vec![stock_line]);

    let waste_line = board
        .waste
        .last()
        .map(|card| card_line(card, app.is_held(PileRef::WASTE, board.waste.len() - 1)))
        .unwrap_or_else(|| Line::from(""));
    draw_pile(frame, cols[1], app, PileRef::WASTE, vec![waste_line]);

    for slot in 0..FOUNDATION_PILES {
        let pile = PileRef::foundation(slot);
        let cards = &board.foundations[slot];
        let line = cards
            .last()
            .map(|card| card_line(card, app.is_held(pile, cards.len() - 1)))
            .unwrap_or_else(|| Line::from("--").dim());
        draw_pile(
            frame,
            cols[TABLEAU_PILES - FOUNDATION_PILES + slot],
            app,
            pile,
            vec![line],
        );
    }
}

fn draw_tableau(frame: &mut Frame, area: Rect, app: &App) {
    let cols = columns(area);
    for (column, cards) in app.game.board().tableau.iter().enumerate() {
        let pile = PileRef::tableau(column);
        let lines = cards
            .iter()
            .enumerate()
            .map(|(index, card)| {
                let mut line = card_line(card, app.is_held(pile, index));
                if app.cursor == pile && app.row == index {
                    line = line.add_modifier(Modifier::REVERSED);
                }
                line
            })
            .collect();
        draw_pile(frame, cols[column], app, pile, lines);
    }
}

fn draw_pile(frame: &mut Frame, area: Rect, app: &App, pile: PileRef, lines: Vec<Line<'static>>) {
    let focused = app.cursor == pile;
    let mut block = Block::default()
        .title(pile.to_string())
        .borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn card_line(card: &Card, held: bool) -> Line<'static> {
    let mut style = match (card.face_up, card.color()) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, SuitColor::Red) => Style::default().fg(Color::Red),
        (true, SuitColor::Black) => Style::default().fg(Color::White),
    };
    if held {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    Line::from(Span::styled(card_label(card), style))
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .rev()
        .take(height)
        .rev()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let block = Block::default().title("Events").borders(Borders::ALL);
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("Keys".bold()),
        Line::from("←/→ h/l Tab   move between piles"),
        Line::from("↑/↓ k/j       move within a column"),
        Line::from("1-7 w s       jump to column, waste, stock"),
        Line::from("Space         pick up / drop cards"),
        Line::from("Enter f       send card to a foundation"),
        Line::from("Esc           cancel drag / close help"),
        Line::from("d             draw from stock"),
        Line::from("n / r         new deal / same deal again"),
        Line::from("Ctrl-s Ctrl-l save / load"),
        Line::from("?  q          help / quit"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_celebration(frame: &mut Frame, celebration: &Celebration) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(Line::from("YOU WIN!".bold()).alignment(Alignment::Center))
        .title_bottom(Line::from("any key: new deal  q: quit").alignment(Alignment::Center))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (w, h) = (CARD_WIDTH as u16, CARD_HEIGHT as u16);
    for bouncing in &celebration.cards {
        if bouncing.x < 0.0 || bouncing.y < 0.0 {
            continue;
        }
        let (x, y) = (bouncing.x as u16, bouncing.y as u16);
        if x + w > inner.width || y + h > inner.height {
            continue;
        }
        let rect = Rect::new(inner.x + x, inner.y + y, w, h);
        let face = Paragraph::new(card_line(&bouncing.card, false))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(face, rect);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
