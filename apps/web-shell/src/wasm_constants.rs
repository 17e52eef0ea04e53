pub(crate) const CONFIG_GLOBAL: &str = "__CONVERT_EVERYTHING_CONFIG__";
pub(crate) const STATE_CHANGED_EVENT: &str = "convert-everything:statechange";
pub(crate) const BEFORE_INSTALL_PROMPT_EVENT: &str = "beforeinstallprompt";
pub(crate) const THEME_ATTRIBUTE: &str = "data-theme";
pub(crate) const DRAGGING_ATTRIBUTE: &str = "data-dragging";
pub(crate) const HELP_OPEN_ATTRIBUTE: &str = "data-help-open";
