pub mod collaborators;
pub mod duration;
pub mod pomodoro;
pub mod scheduler;
pub mod timer;
