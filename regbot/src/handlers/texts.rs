//! User-facing texts.

pub const WELCOME: &str = "Welcome! You are now registered. Send me anything and I will echo it back with the menu.";

pub const OPTION_1_SELECTED: &str = "You chose Option 1";
pub const OPTION_2_SELECTED: &str = "You chose Option 2";
pub const HELP: &str = "Send /start to register, or any message to see the menu.";
