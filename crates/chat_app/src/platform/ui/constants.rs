// Element ids of the widget page.
pub const LAUNCHER_BTN: &str = "launcher-btn";
pub const CHAT_WIDGET: &str = "chat-widget";
pub const MINIMIZE_BTN: &str = "minimize-btn";
pub const USER_INPUT: &str = "user-input";
pub const SEND_BTN: &str = "send-btn";
pub const QUICK_ACTIONS: &str = "quick-actions";

// Terminal commands.
pub const CMD_TOGGLE: &str = "/toggle";
pub const CMD_OPEN: &str = "/open";
pub const CMD_CLOSE: &str = "/close";
pub const CMD_QUICK: &str = "/quick";
pub const CMD_CONNECT: &str = "/connect";
pub const CMD_STATUS: &str = "/status";
pub const CMD_HELP: &str = "/help";
pub const CMD_QUIT: &str = "/quit";
