pub mod colorize;
pub mod theme;

pub use colorize::{StyledLine, colorize};
pub use theme::Theme;
