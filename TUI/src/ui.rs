use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::config::COMMANDS;
use crate::contact::SubmitStatus;
use crate::content::{SkillCategory, CONTACT, EXPERIENCE, OWNER, PROJECTS, SKILLS, TAGLINE};
use crate::form::Field;
use crate::page::Section;
use crate::reveal::Phase;
use crate::scripts::{classify, LineKind, TerminalKind};
use crate::ui_state::Focus;

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const SAPPHIRE_DARK: Color = Color::Rgb(84, 112, 156);   // #54709C - Darker blue
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const WARM_BROWN: Color = Color::Rgb(164, 103, 38);      // #A46726 - Warm brown
const TAN: Color = Color::Rgb(216, 180, 169);            // #D8B4A9 - Tan/beige
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

// Accent colors
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - Purple accent

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border

const NAVBAR_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Rows available to the scrolling page for a terminal `height` rows tall.
pub fn page_height(height: u16) -> u16 {
    height.saturating_sub(2 + NAVBAR_HEIGHT + FOOTER_HEIGHT)
}

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    let area = frame.area();

    // Main layout with padding
    let padded = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NAVBAR_HEIGHT),
            Constraint::Min(1),                 // Page
            Constraint::Length(FOOTER_HEIGHT),  // Command line / hints
        ])
        .split(padded);

    draw_navbar(frame, app, chunks[0]);
    draw_page(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);

    if app.showing_command_popup() {
        draw_command_popup(frame, app, chunks[1]);
    }

    if app.ui.show_help {
        draw_help_overlay(frame, area);
    }
}

/// Border colour that drifts between sapphire and copper.
fn glow_color(anim_frame: usize) -> Color {
    let t = (anim_frame as f64 / 120.0).sin() * 0.5 + 0.5;
    let r = (84.0 + (138.0 - 84.0) * t) as u8;
    let g = (112.0 + (72.0 - 112.0) * t) as u8;
    let b = (156.0 + (38.0 - 156.0) * t) as u8;
    Color::Rgb(r, g, b)
}

fn draw_glass_border(frame: &mut Frame, area: Rect, title: &str, anim_frame: usize, glow: bool) -> Rect {
    let border_color = if glow { glow_color(anim_frame) } else { BORDER_DIM };

    let block = Block::default()
        .title(Span::styled(title.to_string(), Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn draw_navbar(frame: &mut Frame, app: &App, area: Rect) {
    let locked = app.is_page_locked();
    let inner = draw_glass_border(frame, area, " termfolio ", app.animation_frame, locked);

    let current = app.current_section();
    let mut spans: Vec<Span> = Vec::new();
    for (i, section) in Section::ALL.iter().enumerate() {
        let style = if locked {
            Style::default().fg(TEXT_MUTED)
        } else if *section == current {
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        spans.push(Span::styled(format!(" {} ", i + 1), Style::default().fg(COPPER)));
        spans.push(Span::styled(section.title().to_string(), style));
        spans.push(Span::raw("  "));
    }
    if locked {
        spans.push(Span::styled("[locked]", Style::default().fg(BURGUNDY).add_modifier(Modifier::BOLD)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn draw_page(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    for span in app.page.spans() {
        let section_lines = match span.section {
            Section::Home => home_lines(app, width),
            Section::Skills => skills_lines(app, width),
            Section::Projects => projects_lines(app, width),
            Section::Experience => experience_lines(),
            Section::Philosophy => philosophy_lines(app, width),
            Section::Contact => contact_lines(app, width),
        };
        lines.extend(fit_height(section_lines, span.height as usize));
    }

    let inner = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };
    let page = Paragraph::new(lines).scroll((app.ui.scroll, 0));
    frame.render_widget(page, inner);
}

/// Pad or cut `lines` to exactly `height` rows.
fn fit_height(mut lines: Vec<Line<'static>>, height: usize) -> Vec<Line<'static>> {
    lines.truncate(height);
    lines.resize(height, Line::default());
    lines
}

/// Truncate `text` to `width` columns, then pad it with spaces.
/// Line breaks shown as a glyph inside single-row boxes.
fn one_line(text: &str) -> String {
    text.replace('\n', "⏎")
}

fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn heading(text: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled("## ", Style::default().fg(COPPER)),
            Span::styled(text.to_string(), Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
        ]),
        Line::default(),
    ]
}

fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Prompt => Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
        LineKind::PythonPrompt => Style::default().fg(LAVENDER),
        LineKind::Status => Style::default().fg(PALE_YELLOW),
        LineKind::Heading => Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
        LineKind::Bullet => Style::default().fg(TAN),
        LineKind::Success => Style::default().fg(OLIVE),
        LineKind::Listing => Style::default().fg(CYAN_LIGHT),
        LineKind::Process => Style::default().fg(WARM_BROWN),
        LineKind::Data => Style::default().fg(SAPPHIRE_DARK),
        LineKind::Quote => Style::default().fg(TEXT_SECONDARY).add_modifier(Modifier::ITALIC),
        LineKind::Plain => Style::default().fg(TEXT_PRIMARY),
    }
}

fn cursor_visible(app: &App) -> bool {
    // ~530ms blink at 60fps
    (app.animation_tick / 33) % 2 == 0
}

/// A boxed terminal window showing the newest `body_rows` lines.
fn terminal_panel(app: &App, kind: TerminalKind, width: usize, body_rows: usize) -> Vec<Line<'static>> {
    let reveal = app.terminal(kind);
    let inner = width.saturating_sub(4);
    let cursor = if cursor_visible(app) { "█" } else { " " };
    let prompt_style = line_style(LineKind::Prompt);

    let mut body: Vec<(String, Style)> = Vec::new();
    match reveal.phase() {
        Phase::Idle => {
            body.push((format!("{} {}", kind.prompt(), cursor), prompt_style));
        }
        phase => {
            let mut command = format!("{} {}", kind.prompt(), reveal.command_text());
            if phase == Phase::TypingCommand {
                command.push_str(cursor);
            }
            body.push((command, prompt_style));
            for line in reveal.output_lines() {
                body.push((line.clone(), line_style(classify(line))));
            }
            if let Some(partial) = reveal.typing_sub_command() {
                body.push((format!("{}{}", partial, cursor), prompt_style));
            } else if phase == Phase::Done && !reveal.has_pending_injection() {
                body.push((format!("{} {}", kind.prompt(), cursor), prompt_style));
            }
        }
    }
    let skip = body.len().saturating_sub(body_rows);
    body.drain(..skip);
    body.resize(body_rows, (String::new(), Style::default()));

    let border = Style::default().fg(if reveal.phase() == Phase::Done {
        BORDER_DIM
    } else {
        glow_color(app.animation_frame)
    });

    let title = match reveal.phase() {
        Phase::RevealingOutput => format!(
            "─ {} [{}/{}] ",
            kind.title(),
            reveal.current_line(),
            reveal.script().lines.len()
        ),
        _ => format!("─ {} ", kind.title()),
    };
    let fill = width.saturating_sub(2 + title.width());
    let mut lines = vec![Line::from(vec![
        Span::styled("╭", border),
        Span::styled(title, border),
        Span::styled("─".repeat(fill), border),
        Span::styled("╮", border),
    ])];
    for (text, style) in body {
        lines.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(fit_width(&text, inner), style.bg(BG_PANEL)),
            Span::styled(" │", border),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(width.saturating_sub(2))),
        border,
    )));
    lines
}

fn home_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            OWNER.to_string(),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(TAGLINE.to_string(), Style::default().fg(TEXT_SECONDARY))),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(COPPER)),
            Span::styled(app.typewriter.text().to_string(), Style::default().fg(CYAN_LIGHT)),
            Span::styled(if cursor_visible(app) { "|" } else { " " }, Style::default().fg(CYAN_LIGHT)),
        ]),
        Line::default(),
    ];
    lines.extend(terminal_panel(app, TerminalKind::Hero, width, 20));

    let hint = if app.is_page_locked() {
        "Navigation unlocks when the intro finishes".to_string()
    } else {
        "[v] view CV   [2-6] jump to section   [/] commands".to_string()
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(TEXT_MUTED))));
    lines
}

fn level_bar(level: u8) -> String {
    let filled = (level as usize).min(100) / 10;
    format!("{}{} {:>3}%", "█".repeat(filled), "░".repeat(10 - filled), level)
}

fn skills_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = heading("Skills");
    lines.extend(terminal_panel(app, TerminalKind::Skills, width, 14));
    lines.push(Line::default());

    if !app.skills.has_completed() {
        return lines;
    }
    for category in [SkillCategory::Languages, SkillCategory::AiData, SkillCategory::Engineering] {
        lines.push(Line::from(Span::styled(
            category.label().to_string(),
            Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
        )));
        for skill in SKILLS.iter().filter(|s| s.category == category) {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", fit_width(skill.name, 32)), Style::default().fg(TEXT_PRIMARY)),
                Span::styled(level_bar(skill.level), Style::default().fg(SAPPHIRE)),
            ]));
        }
    }
    lines
}

fn projects_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = heading("Projects");
    lines.extend(terminal_panel(app, TerminalKind::Projects, width, 16));
    lines.push(Line::default());

    if !app.projects.has_completed() {
        return lines;
    }
    for project in PROJECTS {
        lines.push(Line::from(Span::styled(
            project.name.to_string(),
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", project.summary),
            Style::default().fg(TEXT_SECONDARY),
        )));
        lines.push(Line::from(Span::styled(
            format!("  [{}]", project.stack.join(", ")),
            Style::default().fg(LAVENDER),
        )));
        lines.push(Line::default());
    }
    lines
}

fn experience_lines() -> Vec<Line<'static>> {
    let mut lines = heading("Experience");
    for entry in EXPERIENCE {
        lines.push(Line::from(vec![
            Span::styled(entry.role.to_string(), Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" @ {}", entry.company), Style::default().fg(COPPER)),
        ]));
        lines.push(Line::from(Span::styled(format!("  {}", entry.period), Style::default().fg(TEXT_MUTED))));
        lines.push(Line::from(Span::styled(format!("  {}", entry.summary), Style::default().fg(TEXT_SECONDARY))));
        lines.push(Line::default());
    }
    lines
}

fn philosophy_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = heading("Philosophy");
    lines.extend(terminal_panel(app, TerminalKind::Philosophy, width, 20));
    lines
}

fn contact_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let form = &app.contact;
    let label_style = Style::default().fg(TEXT_MUTED);
    let value_style = Style::default().fg(TEXT_SECONDARY);

    let mut lines = heading("Contact");
    for (label, value) in [
        ("email", CONTACT.email),
        ("linkedin", CONTACT.linkedin),
        ("github", CONTACT.github),
        ("web", CONTACT.website),
        ("location", CONTACT.location),
        ("status", CONTACT.availability),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", label), label_style),
            Span::styled(value.to_string(), value_style),
        ]));
    }
    lines.push(Line::default());

    let editing = app.ui.focus == Focus::Form;
    let box_width = width.saturating_sub(4).min(72);
    for field in Field::ALL {
        let focused = editing && form.focus == field;
        let marker = if focused { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(COPPER)),
            Span::styled(
                field.label().to_string(),
                if focused {
                    Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
                } else {
                    label_style
                },
            ),
        ]));

        let value = one_line(form.state.get(field));
        let (text, style) = if value.is_empty() && !focused {
            (field.placeholder().to_string(), Style::default().fg(BORDER_DIM))
        } else if focused && cursor_visible(app) {
            (format!("{}|", value), Style::default().fg(TEXT_PRIMARY))
        } else {
            (value.to_string(), Style::default().fg(TEXT_PRIMARY))
        };
        // Keep the end of long values in view
        let overflow = text.width().saturating_sub(box_width);
        let shown: String = text.chars().skip(overflow).collect();
        lines.push(Line::from(vec![
            Span::styled("  [", Style::default().fg(BORDER_DIM)),
            Span::styled(fit_width(&shown, box_width), style.bg(BG_PANEL)),
            Span::styled("]", Style::default().fg(BORDER_DIM)),
        ]));

        if let Some(err) = form.errors.get(field) {
            lines.push(Line::from(Span::styled(format!("  {}", err), Style::default().fg(BURGUNDY))));
        }
    }

    if let Some(general) = form.errors.general() {
        lines.push(Line::from(Span::styled(
            general.to_string(),
            Style::default().fg(BURGUNDY).add_modifier(Modifier::BOLD),
        )));
    }

    let status = match form.status {
        SubmitStatus::Idle if form.is_locked_out() => {
            Span::styled("Contact form locked for this session", Style::default().fg(BURGUNDY))
        }
        SubmitStatus::Idle if editing => Span::styled(
            "[Ctrl+S] send  [Tab] next field  [Esc] leave form",
            Style::default().fg(TEXT_MUTED),
        ),
        SubmitStatus::Idle => Span::styled("[6] or /contact to write a message", Style::default().fg(TEXT_MUTED)),
        SubmitStatus::Submitting => Span::styled(
            format!("{} Sending...", SPINNER[app.animation_frame % SPINNER.len()]),
            Style::default().fg(PALE_YELLOW),
        ),
        SubmitStatus::Success => Span::styled("✔ Message sent", Style::default().fg(OLIVE)),
        SubmitStatus::Error => Span::styled("✘ Delivery failed", Style::default().fg(BURGUNDY)),
    };
    lines.push(Line::default());
    lines.push(Line::from(status));

    for line in &form.terminal_lines {
        let style = if line.starts_with("Error") {
            Style::default().fg(BURGUNDY)
        } else {
            line_style(classify(line))
        };
        lines.push(Line::from(Span::styled(format!("> {}", line), style)));
    }
    lines
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    // Border color based on focus - pulse when focused, dim when not
    let border_color = if app.ui.focus == Focus::Command {
        let glow = ((app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7) as f64;
        let r = (101.0 * glow) as u8;
        let g = (150.0 * glow) as u8;
        let b = (243.0 * glow) as u8;
        Color::Rgb(r, g, b)
    } else {
        BORDER_DIM
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = if app.ui.focus == Focus::Command {
        let cursor = if app.animation_frame % 30 < 15 { "|" } else { " " };
        Line::from(Span::styled(
            format!(" > {}{}", app.ui.command_input, cursor),
            Style::default().fg(TEXT_PRIMARY),
        ))
    } else if let Some(message) = &app.ui.status_message {
        Line::from(Span::styled(format!(" {}", message), Style::default().fg(PALE_YELLOW)))
    } else {
        Line::from(vec![
            Span::styled("ESC", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Span::styled(" quit  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("/", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
            Span::styled(" cmds  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("↑↓ PgUp PgDn", Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)),
            Span::styled(" scroll  ", Style::default().fg(TEXT_MUTED)),
            Span::styled("?", Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)),
            Span::styled(" help", Style::default().fg(TEXT_MUTED)),
        ])
    };
    frame.render_widget(Paragraph::new(content), inner);
}

fn draw_command_popup(frame: &mut Frame, app: &App, page_area: Rect) {
    // Get filtered commands from app
    let filtered = app.get_filtered_commands();

    if filtered.is_empty() {
        return;
    }

    // +1 for the "your input" option, +2 for borders
    let popup_height = (filtered.len() + 3) as u16;
    let popup_width = 44.min(page_area.width.saturating_sub(4));
    let popup_x = page_area.x + 2;
    let popup_y = page_area.y + page_area.height.saturating_sub(popup_height);

    let popup_area = Rect {
        x: popup_x,
        y: popup_y,
        width: popup_width,
        height: popup_height.min(page_area.height),
    };

    // Clear area behind popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Commands ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COPPER))
        .style(Style::default().bg(BG_PANEL));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();

    // First option: current typed input (selected when command_selection is None)
    let input_selected = app.ui.command_selection.is_none();
    let input_style = if input_selected {
        Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY)
    };
    let indicator = if input_selected { ">" } else { " " };
    lines.push(Line::from(vec![
        Span::styled(format!("{} {} ", indicator, &app.ui.command_input), input_style),
        Span::styled("(your input)", Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
    ]));

    for (i, (cmd, desc)) in filtered.iter().enumerate() {
        let is_selected = app.ui.command_selection == Some(i);
        let style = if is_selected {
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        let indicator = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!("{} {} ", indicator, cmd), style),
            Span::styled(format!("- {}", desc), Style::default().fg(TEXT_MUTED)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let keys: [(&str, &str); 11] = [
        ("↑ ↓", "scroll one row"),
        ("PgUp PgDn", "scroll a page"),
        ("1-6", "jump to a section"),
        ("v", "generate and open the CV"),
        ("Tab", "focus the contact form"),
        ("Ctrl+S", "send the contact form"),
        ("Enter", "next field, new line in message"),
        ("Ctrl+V", "paste into the focused input"),
        ("/", "open the command line"),
        ("Esc", "close, leave form, or quit"),
        ("Ctrl+C", "quit"),
    ];

    let height = (keys.len() + COMMANDS.len() + 6) as u16;
    let width = 56.min(area.width.saturating_sub(4));
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height: height.min(area.height),
    };
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Help ", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(SAPPHIRE))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![Line::from(Span::styled(
        "Keys",
        Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
    ))];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), Style::default().fg(CYAN_LIGHT)),
            Span::styled(desc, Style::default().fg(TEXT_SECONDARY)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Commands",
        Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
    )));
    for (cmd, desc) in COMMANDS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", cmd), Style::default().fg(CYAN_LIGHT)),
            Span::styled(*desc, Style::default().fg(TEXT_SECONDARY)),
        ]));
    }
    lines.push(Line::default());
    lines.push(
        Line::from(Span::styled("any key to close", Style::default().fg(TEXT_MUTED)))
            .alignment(Alignment::Center),
    );

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dispatch::Dispatcher;
    use crate::session::SessionStore;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    #[test]
    fn test_fit_width_pads_and_truncates() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdef", 4), "abcd");
        // Wide glyphs never split
        assert_eq!(fit_width("日本語", 5), "日本 ");
    }

    #[test]
    fn test_one_line_marks_breaks() {
        assert_eq!(one_line("Hi.\nBye"), "Hi.⏎Bye");
        assert_eq!(fit_width(&one_line("a\nb"), 4), "a⏎b ");
    }

    #[test]
    fn test_fit_height() {
        let lines = vec![Line::from("a"), Line::from("b"), Line::from("c")];
        assert_eq!(fit_height(lines.clone(), 2).len(), 2);
        assert_eq!(fit_height(lines, 5).len(), 5);
    }

    #[test]
    fn test_terminal_panel_shape() {
        let app = App::new(
            Config::default(),
            SessionStore::in_memory(),
            Dispatcher::simulated(),
            Instant::now(),
        );
        let lines = terminal_panel(&app, TerminalKind::Hero, 40, 6);
        assert_eq!(lines.len(), 8);
        for line in &lines {
            assert_eq!(line.width(), 40);
        }
    }

    #[test]
    fn test_draw_does_not_panic_on_small_terminals() {
        let app = App::new(
            Config::default(),
            SessionStore::in_memory(),
            Dispatcher::simulated(),
            Instant::now(),
        );
        for (w, h) in [(120, 40), (40, 12), (10, 4)] {
            let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
            terminal.draw(|frame| draw(frame, &app)).unwrap();
        }
    }
}
