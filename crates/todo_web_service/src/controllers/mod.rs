pub mod system_controller;
pub mod todo_controller;
