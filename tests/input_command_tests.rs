use crossterm::event::KeyCode;
use btc_ticker::input::{parse_main_command, UiCommand};

#[test]
fn parse_main_command_maps_case_insensitive_char_keys() {
    assert_eq!(parse_main_command(&KeyCode::Char('q')), Some(UiCommand::Quit));
    assert_eq!(parse_main_command(&KeyCode::Char('Q')), Some(UiCommand::Quit));
    assert_eq!(
        parse_main_command(&KeyCode::Char('A')),
        Some(UiCommand::ToggleAutoRefresh)
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('R')),
        Some(UiCommand::RefreshOnce)
    );
}

#[test]
fn parse_main_command_maps_interval_keys() {
    assert_eq!(
        parse_main_command(&KeyCode::Char('+')),
        Some(UiCommand::IncreaseInterval)
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('-')),
        Some(UiCommand::DecreaseInterval)
    );
}

#[test]
fn parse_main_command_has_no_hidden_aliases() {
    for key in [
        KeyCode::Char('p'),
        KeyCode::Char('='),
        KeyCode::Char('_'),
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Left,
        KeyCode::Right,
    ] {
        assert_eq!(parse_main_command(&key), None);
    }
}

#[test]
fn parse_main_command_ignores_unknown_keys() {
    assert_eq!(parse_main_command(&KeyCode::Esc), Some(UiCommand::Quit));
    assert_eq!(parse_main_command(&KeyCode::Char('z')), None);
    assert_eq!(parse_main_command(&KeyCode::Enter), None);
    assert_eq!(parse_main_command(&KeyCode::Tab), None);
}
