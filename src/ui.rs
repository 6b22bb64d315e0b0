//! Terminal UI rendering with ratatui

use crate::game::{Action, GameOverCause, GameState};
use crate::input::KeyBindings;
use crate::login::LoginScreen;
use crate::piece::Piece;
use crate::session::Session;
use crate::settings::Settings;
use crate::tetromino;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Width of the side panels
const PANEL_WIDTH: u16 = 20;

/// Render the login screen with the leaderboard below the input
pub fn render_login(frame: &mut Frame, screen: &LoginScreen) {
    let area = center_rect(frame.area(), 60, 25);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Min(4),
        ])
        .split(area);

    let mut title = vec![
        Line::raw(""),
        Line::styled("S T A C K F A L L", Style::default().fg(Color::Cyan).bold()),
        Line::raw(""),
    ];
    title.extend(piece_banner());
    let title = Paragraph::new(title).alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    // Username input
    let block = Block::default()
        .title(" LOGIN ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let input = if screen.username.is_empty() {
        Span::styled("your name", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(screen.username.clone(), Style::default().fg(Color::Green))
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Player: ", Style::default().fg(Color::White)),
            input,
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::raw(""),
    ];
    match &screen.error {
        Some(error) => lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red))),
        None => lines.push(Line::styled(
            "Enter Play  Esc Quit",
            Style::default().fg(Color::DarkGray),
        )),
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);

    // Leaderboard
    let block = Block::default()
        .title(" TOP PLAYERS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[2]);
    frame.render_widget(block, layout[2]);

    let lines: Vec<Line> = if screen.leaderboard.is_empty() {
        vec![Line::styled("No games yet", Style::default().fg(Color::DarkGray))]
    } else {
        screen
            .leaderboard
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                Line::from(vec![
                    Span::styled(format!("{:>2}. ", rank + 1), Style::default().fg(Color::Gray)),
                    Span::styled(format!("{:<16}", entry.username), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{:>8}", entry.stats.high_score),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        format!(" ({})", entry.stats.games_played),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, session: &Session, settings: &Settings, bindings: &KeyBindings) {
    let area = frame.area();
    let game = &session.game;
    let board = game.board();

    let board_width = board.width() as u16 * 2 + 2;
    let board_height = board.height() as u16 + 2;
    let game_area = center_rect(area, PANEL_WIDTH * 2 + board_width, board_height);

    // Create main layout: player | board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(PANEL_WIDTH),
            Constraint::Length(board_width),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(game_area);

    let left_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(main_layout[0]);

    render_player(frame, left_layout[0], session);
    render_controls(frame, left_layout[1], bindings);
    render_board(frame, main_layout[1], session, settings);

    // Right side: next piece and stats
    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(8)])
        .split(main_layout[2]);

    render_next(frame, right_layout[0], game.next_piece(), settings);
    render_stats(frame, right_layout[1], session);

    // Overlays
    if game.is_paused() {
        render_overlay(
            frame,
            area,
            "PAUSED",
            &[format!("Press {} to resume", bindings.describe(Action::Pause))],
        );
    } else if let GameState::GameOver(cause) = game.state() {
        render_game_over(frame, area, session, cause);
    }
}

/// The seven pieces side by side, two rows tall
fn piece_banner() -> Vec<Line<'static>> {
    let shapes = tetromino::all_shapes();
    (0..2)
        .map(|row| {
            let mut spans = Vec::new();
            for (shape, color) in &shapes {
                for col in 0..shape.cols() {
                    if row < shape.rows() && shape.is_filled(row, col) {
                        spans.push(Span::styled("██", Style::default().fg(*color)));
                    } else {
                        spans.push(Span::raw(EMPTY));
                    }
                }
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        })
        .collect()
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the logged-in player's record
fn render_player(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .title(" PLAYER ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::styled(
            session.game.username().to_string(),
            Style::default().fg(Color::Green).bold(),
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Best  ", Style::default().fg(Color::Gray)),
            Span::styled(
                session.player.high_score.to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("Games ", Style::default().fg(Color::Gray)),
            Span::styled(
                session.player.games_played.to_string(),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the key help panel
fn render_controls(frame: &mut Frame, area: Rect, bindings: &KeyBindings) {
    let block = Block::default()
        .title(" CONTROLS ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = [
        (Action::MoveLeft, "Left"),
        (Action::MoveRight, "Right"),
        (Action::SoftDrop, "Drop"),
        (Action::Rotate, "Rotate"),
        (Action::Pause, "Pause"),
        (Action::Quit, "Quit"),
    ];
    let lines: Vec<Line> = entries
        .iter()
        .map(|(action, label)| {
            Line::from(vec![
                Span::styled(format!("{:<7}", label), Style::default().fg(Color::Gray)),
                Span::styled(bindings.describe(*action), Style::default().fg(Color::White)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, next: Option<&Piece>, settings: &Settings) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(piece) = next else {
        return;
    };
    let (block_char, _) = settings.visual.block_chars();
    let style = Style::default().fg(piece.color());

    let lines: Vec<Line> = (0..piece.shape.rows())
        .map(|row| {
            let spans: Vec<Span> = (0..piece.shape.cols())
                .map(|col| {
                    if piece.shape.is_filled(row, col) {
                        Span::styled(block_char, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, center_rect(inner, inner.width, piece.shape.rows() as u16));
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, session: &Session, settings: &Settings) {
    let game = &session.game;
    let board = game.board();
    let (block_char, empty_char) = settings.visual.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Cells of the falling piece that are inside the visible area
    let piece_cells: Vec<(i32, i32)> = game
        .current_piece()
        .map(|piece| piece.cells().filter(|&(_, y)| y >= 0).collect())
        .unwrap_or_default();
    let piece_color = game.current_piece().map(|piece| piece.color());

    let lines: Vec<Line> = board
        .rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    let on_piece = piece_cells.contains(&(x as i32, y as i32));
                    let color = if on_piece { piece_color } else { cell.color() };
                    match color {
                        Some(color) => Span::styled(block_char, Style::default().fg(color)),
                        None => Span::styled(empty_char, Style::default().fg(Color::DarkGray)),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = session.game.score();
    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("LEVEL", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(score.level.to_string(), Style::default().fg(Color::Cyan))),
        Line::raw(""),
        Line::from(Span::styled("LINES", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(score.lines.to_string(), Style::default().fg(Color::Green))),
        Line::raw(""),
        Line::from(Span::styled(
            format!("{} pieces, {}ms", session.game.pieces_locked(), score.drop_interval_ms),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the game over popup
fn render_game_over(frame: &mut Frame, area: Rect, session: &Session, cause: GameOverCause) {
    let mut lines = vec![format!("Score: {}", session.game.score().points)];

    if session.awaiting_submission() {
        lines.push("Saving score...".to_string());
    } else if cause == GameOverCause::ToppedOut {
        let new_record = session.outcome.as_ref().is_some_and(|o| o.is_new_record);
        lines.push(if new_record { "NEW RECORD!" } else { "" }.to_string());
    }
    lines.push("Enter Play again".to_string());
    lines.push("Esc Change player".to_string());

    render_overlay(frame, area, "GAME OVER", &lines);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, body: &[String]) {
    let popup_width = 26u16;
    let popup_height = body.len() as u16 + 4;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
    ];
    for line in body {
        let style = if line.starts_with("NEW RECORD") {
            Style::default().fg(Color::Magenta).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        text.push(Line::styled(line.clone(), style));
    }

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
