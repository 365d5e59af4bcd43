mod bot;
mod bubble;
mod expert;
mod full;

pub use bot::{Bot, BotProps, ChatEntry, Role};
pub use bubble::Bubble;
pub use expert::ExpertPage;
pub use full::Full;
