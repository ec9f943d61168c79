use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use tokio::time::Instant;

use msgfeed_core::feed::{EMPTY_TEXT, ERROR_HEADLINE, LIMIT_OPTIONS, LOADING_TEXT, RETRY_LABEL};
use msgfeed_core::{ContainerContent, Theme, ThemeAttribute};

use crate::app::{App, InputMode};

/// Terminal color for a theme attribute. Unparseable values fall back to
/// the terminal's own color.
fn theme_color(theme: &Theme, attribute: ThemeAttribute) -> Color {
    theme
        .rgb(attribute)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Reset)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let theme = app.view.theme().clone();

    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(theme_color(&theme, ThemeAttribute::Background))
                .fg(theme_color(&theme, ThemeAttribute::Text)),
        ),
        area,
    );

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    // Standalone runs keep a margin around the feed; an expanded host view
    // uses the whole body
    let body_area = if app.view.is_expanded() {
        body_area
    } else {
        body_area.inner(Margin {
            vertical: 0,
            horizontal: 1,
        })
    };

    render_header(app, &theme, frame, header_area);
    render_container(app, &theme, frame, body_area);
    render_footer(app, &theme, frame, footer_area);

    if app.input_mode == InputMode::Composing {
        render_compose(app, &theme, frame, area);
    }
}

fn render_header(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let hint = Style::default().fg(theme_color(theme, ThemeAttribute::Hint));

    let mut spans = vec![
        Span::styled(" Повідомлення ", Style::default().fg(theme_color(theme, ThemeAttribute::Link)).bold()),
        Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), hint),
    ];
    if let Some(status) = app.view.status() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.to_string(), hint));
    }

    let header = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(theme_color(theme, ThemeAttribute::SecondaryBackground)));
    frame.render_widget(header, area);
}

/// Lines making up the feed container for the given content.
pub fn container_lines(content: &ContainerContent, theme: &Theme, animation_frame: u8) -> Vec<Line<'static>> {
    let text = Style::default().fg(theme_color(theme, ThemeAttribute::Text));
    let hint = Style::default().fg(theme_color(theme, ThemeAttribute::Hint));
    let button = Style::default()
        .bg(theme_color(theme, ThemeAttribute::ButtonBackground))
        .fg(theme_color(theme, ThemeAttribute::ButtonText));

    match content {
        ContainerContent::Loading => {
            // Animate the trailing ellipsis
            let base = LOADING_TEXT.trim_end_matches('.');
            let dots = ".".repeat(animation_frame as usize + 1);
            vec![Line::from(Span::styled(format!("{}{}", base, dots), hint))]
        }
        ContainerContent::Empty => vec![Line::from(Span::styled(EMPTY_TEXT, hint))],
        ContainerContent::Failed { detail } => vec![
            Line::from(Span::styled(ERROR_HEADLINE, Style::default().fg(Color::Red).bold())),
            Line::from(Span::styled(detail.clone(), hint)),
            Line::default(),
            Line::from(vec![
                Span::styled(" Enter ", button.add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {} ", RETRY_LABEL), button),
            ]),
        ],
        ContainerContent::Messages(cards) => {
            let mut lines = Vec::new();
            for card in cards {
                // Message text is shown verbatim, one terminal line per text line
                for text_line in card.text.lines() {
                    lines.push(Line::from(Span::styled(text_line.to_string(), text)));
                }
                if let Some(label) = card.time_label.as_deref().filter(|l| !l.is_empty()) {
                    lines.push(Line::from(Span::styled(label.to_string(), hint.add_modifier(Modifier::ITALIC))));
                }
                lines.push(Line::default()); // Empty line between messages
            }
            lines
        }
    }
}

/// Rows the lines occupy once wrapped to `width`.
pub fn wrapped_line_count(lines: &[Line<'_>], width: u16) -> u16 {
    let rows = Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_container(app: &mut App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let count = app.view.content().cards().len();
    let title = if count > 0 {
        format!(" Повідомлення ({}) ", count)
    } else {
        " Повідомлення ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme_color(theme, ThemeAttribute::Hint)))
        .title(title);

    let inner_area = block.inner(area);
    app.content_height = inner_area.height;

    let lines = container_lines(app.view.content(), theme, app.animation_frame);
    app.total_content_lines = wrapped_line_count(&lines, inner_area.width);
    app.content_scroll = app
        .content_scroll
        .min(app.total_content_lines.saturating_sub(app.content_height));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0));

    frame.render_widget(paragraph, area);

    if app.total_content_lines > app.content_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(app.total_content_lines as usize)
            .position(app.content_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_footer(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(theme_color(theme, ThemeAttribute::Text));
    let button = Style::default()
        .bg(theme_color(theme, ThemeAttribute::ButtonBackground))
        .fg(theme_color(theme, ThemeAttribute::ButtonText));

    let refresh_style = if app.view.is_refresh_highlighted(Instant::now()) {
        button.add_modifier(Modifier::REVERSED)
    } else {
        button
    };

    let mut spans = vec![Span::styled(format!(" {} ", app.view.state().refresh_label()), refresh_style)];

    // Limit selector
    spans.push(Span::raw(" "));
    for option in LIMIT_OPTIONS {
        let style = if option == app.view.limit() {
            button.add_modifier(Modifier::BOLD)
        } else {
            label_style
        };
        spans.push(Span::styled(format!(" {} ", option), style));
    }

    spans.extend(vec![
        Span::raw(" "),
        Span::styled(" r ", key_style),
        Span::styled(" refresh ", label_style),
        Span::styled(" [/] ", key_style),
        Span::styled(" limit ", label_style),
        Span::styled(" n ", key_style),
        Span::styled(" new ", label_style),
        Span::styled(" q ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_compose(app: &App, theme: &Theme, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 6;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height.min(area.height));

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme_color(theme, ThemeAttribute::Link)))
        .title(" Нове повідомлення (Enter - надіслати, Esc - скасувати) ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height == 0 {
        return;
    }

    let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(Paragraph::new(app.compose_input.as_str()), input_area);

    let cursor_x = app.compose_cursor.min(input_area.width as usize) as u16;
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let status = if app.view.is_submitting() {
        Some(Span::styled("Надсилання...", Style::default().fg(theme_color(theme, ThemeAttribute::Hint))))
    } else {
        app.view
            .submit_error()
            .map(|e| Span::styled(e.to_string(), Style::default().fg(Color::Red)))
    };

    if let Some(status) = status {
        if inner.height > 2 {
            let status_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
            frame.render_widget(Paragraph::new(Line::from(status)), status_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgfeed_core::MessageCard;
    use ratatui::{backend::TestBackend, Terminal};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn card(text: &str, time_label: Option<&str>) -> MessageCard {
        MessageCard {
            text: text.to_string(),
            time_label: time_label.map(str::to_string),
        }
    }

    #[test]
    fn test_cards_render_in_order_with_labels() {
        let content = ContainerContent::Messages(vec![
            card("перше", Some("Сьогодні, 10:30")),
            card("<b>друге</b>", None),
        ]);
        let lines: Vec<String> = container_lines(&content, &Theme::default(), 0)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(lines, vec!["перше", "Сьогодні, 10:30", "", "<b>друге</b>", ""]);
    }

    #[test]
    fn test_placeholders() {
        let theme = Theme::default();

        let empty = container_lines(&ContainerContent::Empty, &theme, 0);
        assert_eq!(empty.len(), 1);
        assert_eq!(line_text(&empty[0]), "Повідомлень поки немає");

        let loading = container_lines(&ContainerContent::Loading, &theme, 2);
        assert_eq!(line_text(&loading[0]), "Завантаження...");
    }

    #[test]
    fn test_error_block_has_detail_and_retry() {
        let content = ContainerContent::Failed {
            detail: "Сервер повернув помилку: 500".to_string(),
        };
        let lines: Vec<String> = container_lines(&content, &Theme::default(), 0)
            .iter()
            .map(line_text)
            .collect();

        assert_eq!(lines[0], "Не вдалося завантажити повідомлення");
        assert!(lines[1].contains("500"));
        assert!(lines[3].contains("Спробувати ще раз"));
    }

    #[test]
    fn test_scroll_extent_counts_wrapped_rows() {
        let long = "слово ".repeat(12);
        let content = ContainerContent::Messages(vec![card(long.trim_end(), None)]);
        let lines = container_lines(&content, &Theme::default(), 0);
        assert_eq!(lines.len(), 2);

        let rows = wrapped_line_count(&lines, 20);
        assert!(rows >= 4, "expected the text to wrap, got {} rows", rows);
        assert!(rows as usize > lines.len());
        assert_eq!(wrapped_line_count(&lines, 200), 2);
    }

    #[test]
    fn test_theme_color_fallback() {
        let theme = Theme::default();
        assert_eq!(
            theme_color(&theme, ThemeAttribute::Link),
            Color::Rgb(0x24, 0x81, 0xcc)
        );
    }

    #[test]
    fn test_container_renders_into_terminal() {
        use msgfeed_core::{FeedViewConfig, MessageFeedView, MessagesApi};
        use std::sync::Arc;

        let view = MessageFeedView::new(
            Arc::new(MessagesApi::new("http://127.0.0.1:9")),
            FeedViewConfig::default(),
        );
        let mut app = App::new(view, None, None);

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(screen.contains("Завантаження"));
        assert!(screen.contains("Оновлюється") || screen.contains("🔄"));
        assert_eq!(app.content_height, 8);
    }
}
