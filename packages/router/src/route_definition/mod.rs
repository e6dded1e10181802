//! Route Definitions
//!
//! A route table is built from an ordered sequence of [`Route`]s. Each route
//! couples a path pattern with its content (an element tag or a custom render
//! function), an optional module loader and the guard flags. The table
//! resolves URLs first-match-wins, so declaration order is significant and
//! the catch-all `"*"` belongs last.

mod content;
pub use content::*;

mod pattern;
pub use pattern::*;

mod route;
pub use route::*;

mod table;
pub use table::*;
