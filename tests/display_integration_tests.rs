use chatwin::core::editor::EditEvent;
use chatwin::tui::{DriverOptions, HeadlessDriver, ScriptedInput};
use chatwin::{ColorId, Display, DisplayError, LogEntry, PrintOptions, TextStyle};
use ratatui::style::{Color, Modifier};

// ============================================================================
// Helper Functions
// ============================================================================

fn display(width: u16, height: u16, input: ScriptedInput) -> Display<HeadlessDriver> {
    Display::headless(width, height, input).expect("headless display")
}

/// Log rows as drawn on the (test) terminal, trailing blanks trimmed.
fn screen_log(display: &Display<HeadlessDriver>) -> Vec<String> {
    screen_rows(display)[..usize::from(display.height() - 2)].to_vec()
}

fn screen_input(display: &Display<HeadlessDriver>) -> String {
    screen_rows(display)[usize::from(display.height() - 1)].clone()
}

fn screen_rows(display: &Display<HeadlessDriver>) -> Vec<String> {
    let buffer = display.driver().backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            let row: String = (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

fn cursor_in_input(display: &Display<HeadlessDriver>) -> bool {
    let surface = display.driver().surface();
    let input = surface.region_area(display.input_region()).unwrap();
    surface
        .cursor_position()
        .is_some_and(|pos| input.contains(pos))
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_construction_rejects_two_row_terminal() {
    let result = Display::headless(80, 2, ScriptedInput::new());
    assert!(matches!(result, Err(DisplayError::DriverInit(_))));
}

#[test]
fn test_construction_rejects_zero_width_terminal() {
    let result = Display::headless(0, 10, ScriptedInput::new());
    assert!(matches!(result, Err(DisplayError::DriverInit(_))));
}

#[test]
fn test_smallest_display_has_one_log_row() {
    let mut display = display(5, 3, ScriptedInput::new());
    display.print(["hey"], &PrintOptions::default().terminator(""));
    assert_eq!(screen_rows(&display), ["hey", "─────", ""]);
}

#[test]
fn test_palette_follows_reported_colours() {
    let options = DriverOptions {
        colors: 8,
        ..Default::default()
    };
    let display = Display::headless_with(20, 5, ScriptedInput::new(), options).unwrap();
    let palette = display.driver().palette();
    assert_eq!(display.color_count(), 8);
    for id in 1..=8u16 {
        assert_eq!(
            palette.resolve(ColorId(id)),
            Some(Color::Indexed((id - 1) as u8))
        );
    }
    assert_eq!(palette.resolve(ColorId(0)), None);
}

// ============================================================================
// print / clear
// ============================================================================

#[test]
fn test_print_exact_text() {
    let mut display = display(30, 6, ScriptedInput::new());
    display.print(
        ["a", "b", "c"],
        &PrintOptions::default().separator("-").terminator("!"),
    );
    assert_eq!(screen_log(&display)[0], "a-b-c!");
    assert!(cursor_in_input(&display));
}

#[test]
fn test_print_mixed_display_values() {
    let mut display = display(30, 6, ScriptedInput::new());
    let items: Vec<Box<dyn std::fmt::Display>> =
        vec![Box::new("pi"), Box::new(2.5), Box::new('!')];
    display.print(items, &PrintOptions::default());
    assert_eq!(screen_log(&display)[0], "pi 2.5 !");
}

#[test]
fn test_print_nothing() {
    let mut display = display(30, 6, ScriptedInput::new());
    display.print(Vec::<&str>::new(), &PrintOptions::default());
    assert!(screen_log(&display).iter().all(String::is_empty));
    assert!(cursor_in_input(&display));
}

#[test]
fn test_colour_and_style_reach_the_screen() {
    let mut display = display(30, 6, ScriptedInput::new());
    display.print(
        ["warn"],
        &PrintOptions::default()
            .style(TextStyle::STANDOUT)
            .color(ColorId(2)),
    );
    let cell = &display.driver().backend().buffer()[(0, 0)];
    assert_eq!(cell.fg, Color::Indexed(1));
    assert!(cell.modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_long_lines_wrap_and_scroll() {
    let mut display = display(10, 5, ScriptedInput::new());
    display.println("0123456789abcdef");
    display.println("next");
    // 3 log rows: the 16-char line took two, "next" forced a scroll
    assert_eq!(screen_log(&display), ["abcdef", "next", ""]);
    assert_eq!(screen_rows(&display)[3], "─".repeat(10));
}

#[test]
fn test_log_overflow_leaves_input_alone() {
    let input = ScriptedInput::new().typed("draft").idle();
    let mut display = display(20, 6, input);
    let sender = display.log_sender();
    for i in 0..50 {
        sender.send_text(format!("message {i}")).unwrap();
    }
    // The script ends without a submit, so ask fails after draining
    assert_eq!(display.ask("> "), Err(DisplayError::InputClosed));
    assert_eq!(
        screen_log(&display),
        ["message 47", "message 48", "message 49", ""]
    );
    assert_eq!(screen_input(&display), "> draft");
}

#[test]
fn test_clear_then_read_is_empty() {
    let mut display = display(20, 6, ScriptedInput::new().line("kept"));
    display.ask("> ").unwrap();
    display.println("to be cleared");
    display.clear();
    assert!(screen_log(&display).iter().all(String::is_empty));
    assert_eq!(screen_input(&display), "> kept");

    // Writing after a clear starts at the top again
    display.println("fresh");
    assert_eq!(screen_log(&display)[0], "fresh");
}

// ============================================================================
// ask
// ============================================================================

#[test]
fn test_ask_with_prompt() {
    let mut display = display(20, 5, ScriptedInput::new().line("Bob"));
    assert_eq!(display.ask("Name: ").unwrap(), "Bob");
    assert_eq!(screen_input(&display), "Name: Bob");
    let prompt_cell = &display.driver().backend().buffer()[(0, 4)];
    assert!(prompt_cell.modifier.contains(Modifier::BOLD));
}

#[test]
fn test_ask_caps_input_at_width_minus_prompt() {
    let typed = "y".repeat(40);
    let mut display = display(20, 5, ScriptedInput::new().line(&typed));
    assert_eq!(display.ask("Name: ").unwrap(), "y".repeat(14));
}

#[test]
fn test_ask_without_prompt_uses_full_width() {
    let typed = "z".repeat(40);
    let mut display = display(20, 5, ScriptedInput::new().line(&typed));
    assert_eq!(display.ask("").unwrap(), "z".repeat(20));
}

#[test]
fn test_ask_closed_stream_gives_no_partial_text() {
    let mut display = display(20, 5, ScriptedInput::new().typed("half a li"));
    assert_eq!(display.ask("Name: "), Err(DisplayError::InputClosed));
}

#[test]
fn test_ask_kill_line_and_paste() {
    let input = ScriptedInput::new()
        .typed("oops")
        .event(EditEvent::KillLine)
        .event(EditEvent::Paste("pasted\nignored".to_string()))
        .event(EditEvent::Submit);
    let mut display = display(20, 5, input);
    assert_eq!(display.ask("> ").unwrap(), "pasted");
}

#[test]
fn test_conversation_round_trip() {
    let input = ScriptedInput::new().line("hi").line("bye");
    let mut display = display(30, 8, input);

    let mut transcript = Vec::new();
    while let Ok(line) = display.ask("> ") {
        display.print(
            ["you:", line.as_str()],
            &PrintOptions::default().color(ColorId(3)),
        );
        transcript.push(line);
    }

    assert_eq!(transcript, ["hi", "bye"]);
    assert_eq!(screen_log(&display)[..2], ["you: hi", "you: bye"]);
    assert!(cursor_in_input(&display));
}

#[test]
fn test_background_output_interleaves_with_typing() {
    let input = ScriptedInput::new()
        .typed("wor")
        .idle()
        .typed("ld")
        .event(EditEvent::Submit);
    let mut display = display(30, 6, input);
    let sender = display.log_sender();

    let worker = std::thread::spawn(move || {
        sender
            .send(LogEntry::styled("server: ping", TextStyle::BOLD, ColorId(2)))
            .unwrap();
    });
    worker.join().unwrap();

    assert_eq!(display.ask("> ").unwrap(), "world");
    assert_eq!(screen_log(&display)[0], "server: ping");
    assert_eq!(screen_input(&display), "> world");
    assert!(cursor_in_input(&display));
}
