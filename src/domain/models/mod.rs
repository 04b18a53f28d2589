mod action;
mod action_result;
mod backend;
mod channel;
mod chat;
mod event;
mod page;
mod session;
mod tab;
mod textarea;

pub use action::*;
pub use action_result::*;
pub use backend::*;
pub use channel::*;
pub use chat::*;
pub use event::*;
pub use page::*;
pub use session::*;
pub use tab::*;
pub use textarea::*;
