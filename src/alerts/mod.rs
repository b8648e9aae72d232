pub mod notifier;
pub mod sounder;
