pub mod fetch;
pub mod model;
pub mod render;
pub mod runtime;
pub mod terminal;
pub mod theme;
pub mod update;

pub use fetch::fetch_agenda;
pub use model::{Agenda, AppMessage, Command, ViewState};
pub use render::{render, render_static, RenderContext};
pub use runtime::{event_loop, run, RunOptions};
pub use theme::Theme;
pub use update::update;
