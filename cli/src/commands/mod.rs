mod fetch;
mod helpers;
mod render;
mod search;

pub(crate) use fetch::cmd_fetch;
pub(crate) use render::cmd_render;
pub(crate) use search::{cmd_get, cmd_list, cmd_search};
