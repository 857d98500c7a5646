mod game_vm;

pub use game_vm::{
    EnterAction, GameSnapshot, GameVm, Screen, enter_action, feedback_class, screen_for,
    start_game,
};
