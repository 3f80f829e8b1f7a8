use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    if action == InputAction::Quit {
        app.should_quit = true;
        return;
    }
    if app.celebration.is_some() {
        if !matches!(action, InputAction::None) {
            app.finish_celebration();
        }
        return;
    }
    match action {
        InputAction::None | InputAction::Quit => {}
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::MoveLeft => app.cycle_pile(false),
        InputAction::MoveRight => app.cycle_pile(true),
        InputAction::MoveUp => app.move_row(false),
        InputAction::MoveDown => app.move_row(true),
        InputAction::JumpTableau(column) => app.jump_to(klondike_core::PileRef::tableau(column)),
        InputAction::JumpWaste => app.jump_to(klondike_core::PileRef::WASTE),
        InputAction::JumpStock => app.jump_to(klondike_core::PileRef::STOCK),
        InputAction::GrabOrDrop => app.grab_or_drop(),
        InputAction::AutoPlay => app.auto_play(),
        InputAction::Cancel => {
            if app.show_help {
                app.show_help = false;
            } else {
                app.cancel_drag();
            }
        }
        InputAction::Draw => app.draw_stock(),
        InputAction::NewGame => app.new_game(),
        InputAction::DealAgain => app.deal_again(),
        InputAction::SaveState => app.save(),
        InputAction::LoadState => app.load(),
    }
}
