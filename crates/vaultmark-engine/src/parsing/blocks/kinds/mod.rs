mod block_quote;
mod code_fence;
mod heading;
mod list_marker;
mod table;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceOpen};
pub use heading::AtxHeading;
pub use list_marker::ListMarker;
pub use table::TableRow;

/// `$$` on its own line opens and closes a math block.
pub struct MathFence;

impl MathFence {
    pub const DELIM: &'static str = "$$";
}

/// `---` on its own line.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const LINE: &'static str = "---";
}
