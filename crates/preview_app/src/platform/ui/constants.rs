pub const LOADING_INDICATOR: &str = "[ generating... ]";
pub const PREVIEW_HEADING: &str = "Generated Sandbox:";
pub const OPEN_LINK_LABEL: &str = "Open in new tab:";
pub const SHARE_LINK_LABEL: &str = "Preview URL:";
pub const FIXED_CODE_OPEN: &str = "--- fixed code ---";
pub const FIXED_CODE_CLOSE: &str = "------------------";
pub const SEPARATOR: &str = "==================================================";
pub const INPUT_HINT: &str =
    "Enter a prompt, `:frame-error <message> [| <stack>]` to raise a preview error, or `:quit`.";
