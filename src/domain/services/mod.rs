pub mod actions;
mod app_state;
mod chat_session;
pub mod clipboard;
mod dispatcher;
pub mod events;
mod output;
mod scroll;
mod tabs;
mod token;

pub use app_state::*;
pub use chat_session::*;
pub use dispatcher::*;
pub use output::*;
pub use scroll::*;
pub use tabs::*;
pub use token::*;
