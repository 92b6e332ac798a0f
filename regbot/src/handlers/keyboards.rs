use regbot_core::{InlineButton, InlineKeyboard};

pub const CALLBACK_OPTION_1: &str = "option_1";
pub const CALLBACK_OPTION_2: &str = "option_2";
pub const CALLBACK_HELP: &str = "help";

/// Two options on the first row, Help below.
pub fn main_menu() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            InlineButton::callback("Option 1", CALLBACK_OPTION_1),
            InlineButton::callback("Option 2", CALLBACK_OPTION_2),
        ],
        vec![InlineButton::callback("Help", CALLBACK_HELP)],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_layout() {
        let menu = main_menu();
        assert_eq!(menu.rows.len(), 2);
        assert_eq!(menu.rows[0].len(), 2);
        assert_eq!(menu.rows[0][0].callback_data, "option_1");
        assert_eq!(menu.rows[0][1].label, "Option 2");
        assert_eq!(menu.rows[1], vec![InlineButton::callback("Help", "help")]);
    }
}
