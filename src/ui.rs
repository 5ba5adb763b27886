use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};
use crate::app::App;
use crate::message::ChatRole;
use crate::panel::{EntryKind, PanelEntry};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat panel, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.show_model_picker {
        render_model_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.is_waiting() {
        Span::styled(" waiting ", Style::default().fg(Color::Black).bg(Color::Yellow))
    } else {
        Span::styled(" idle ", Style::default().fg(Color::Black).bg(Color::Green))
    };

    let title = Line::from(vec![
        Span::styled(" Chat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{} ", app.view.selected_model),
            Style::default().fg(Color::White).bold(),
        ),
        Span::styled(
            format!("{} ", app.endpoint_url),
            Style::default().fg(Color::Gray),
        ),
        status,
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn entry_lines(entry: &PanelEntry, animation_frame: u8) -> Vec<Line<'static>> {
    let (label_color, body_style) = match (entry.role, entry.kind) {
        (_, EntryKind::Notice) => (Color::Red, Style::default().fg(Color::Red)),
        (_, EntryKind::Placeholder) => (
            Color::Yellow,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
        (ChatRole::User, _) => (Color::Cyan, Style::default()),
        (ChatRole::Assistant, _) => (Color::Yellow, Style::default()),
        (ChatRole::System, _) => (Color::Magenta, Style::default().fg(Color::Gray)),
    };

    let mut lines = vec![Line::from(Span::styled(
        entry.role.display_label(),
        Style::default().fg(label_color).add_modifier(Modifier::BOLD),
    ))];

    if entry.kind == EntryKind::Placeholder {
        // Animated ellipsis: cycles through ".", "..", "..."
        let text = entry.text();
        let base = text.trim_end_matches('.');
        let dots = ".".repeat(animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(format!("{}{}", base, dots), body_style)));
    } else {
        for line in &entry.lines {
            lines.push(Line::from(Span::styled(line.clone(), body_style)));
        }
    }

    lines.push(Line::default());
    lines
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation (Tab to change model) ");

    // Inner size minus borders, used for wrap and scroll calculations
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    app.view.panel.set_viewport(inner_width, inner_height);

    let panel = &app.view.panel;
    let text = if panel.is_empty() {
        Text::from(Span::styled(
            "Type a message and press Enter...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let lines: Vec<Line> = panel
            .entries()
            .iter()
            .flat_map(|entry| entry_lines(entry, app.animation_frame))
            .collect();
        Text::from(lines)
    };

    let chat = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((panel.scroll(), 0));
    frame.render_widget(chat, area);

    let total_lines = panel.total_lines();
    if total_lines > inner_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut scrollbar_state = ScrollbarState::new(total_lines.saturating_sub(inner_height) as usize)
            .position(panel.scroll() as usize);
        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin { vertical: 1, horizontal: 0 }),
            &mut scrollbar_state,
        );
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let view = &app.view;
    let (border_color, title) = if view.send_enabled {
        (Color::Yellow, " Message (Enter to send) ")
    } else {
        (Color::DarkGray, " Message (waiting for reply) ")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = view.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = view.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_color = if view.send_enabled { Color::Cyan } else { Color::Gray };
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(text_color))
        .block(block);
    frame.render_widget(input, area);

    if view.input_focused && !app.show_model_picker {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.show_model_picker {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" model ", label_style),
            Span::styled(" PgUp/PgDn ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_model_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = (app.available_models.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Select Model ");

    let items: Vec<ListItem> = app
        .available_models
        .iter()
        .map(|model| {
            let style = if model == &app.view.selected_model {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(" {} ", model)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.model_picker_state);
}
