pub mod attendance;
pub mod check_in_window;
