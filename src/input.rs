use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    ToggleAutoRefresh,
    IncreaseInterval,
    DecreaseInterval,
    RefreshOnce,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Esc => Some(UiCommand::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(UiCommand::Quit),
            'a' => Some(UiCommand::ToggleAutoRefresh),
            '+' => Some(UiCommand::IncreaseInterval),
            '-' => Some(UiCommand::DecreaseInterval),
            'r' => Some(UiCommand::RefreshOnce),
            _ => None,
        },
        _ => None,
    }
}
