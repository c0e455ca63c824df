pub mod countdown;
pub mod opengraph;
pub mod util;
