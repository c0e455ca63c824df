pub mod add;
pub mod list;
pub mod preview;
pub mod price;
pub mod refresh;
pub mod remove;
pub mod setup;
pub mod ui;
