use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    JumpTableau(usize),
    JumpWaste,
    JumpStock,
    GrabOrDrop,
    AutoPlay,
    Cancel,
    Draw,
    NewGame,
    DealAgain,
    SaveState,
    LoadState,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Esc => InputAction::Cancel,
        KeyCode::Left => InputAction::MoveLeft,
        KeyCode::Right | KeyCode::Tab => InputAction::MoveRight,
        KeyCode::BackTab => InputAction::MoveLeft,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Enter => InputAction::AutoPlay,
        KeyCode::Char(' ') => InputAction::GrabOrDrop,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('h') => InputAction::MoveLeft,
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::LoadState
        }
        KeyCode::Char('l') => InputAction::MoveRight,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::SaveState
        }
        KeyCode::Char('s') => InputAction::JumpStock,
        KeyCode::Char('w') => InputAction::JumpWaste,
        KeyCode::Char('f') => InputAction::AutoPlay,
        KeyCode::Char('d') => InputAction::Draw,
        KeyCode::Char('n') => InputAction::NewGame,
        KeyCode::Char('r') => InputAction::DealAgain,
        KeyCode::Char('S') => InputAction::SaveState,
        KeyCode::Char('L') => InputAction::LoadState,
        KeyCode::Char(c @ '1'..='7') => {
            InputAction::JumpTableau(c as usize - '1' as usize)
        }
        _ => InputAction::None,
    }
}
