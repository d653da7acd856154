pub mod check_in_window;
pub mod role;
