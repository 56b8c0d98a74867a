use preview_core::{AppViewModel, OutputBlock};

use super::constants::*;

/// Renders the output area as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![SEPARATOR.to_string()];
    lines.extend(view.output.iter().flat_map(render_block));
    // Loading indicator sits below the output area, like the page spinner.
    if view.loading {
        lines.push(LOADING_INDICATOR.to_string());
    }
    lines
}

fn render_block(block: &OutputBlock) -> Vec<String> {
    match block {
        OutputBlock::Notice(text) | OutputBlock::Status(text) => vec![text.clone()],
        OutputBlock::Error(text) => vec![format!("! {text}")],
        OutputBlock::Preview {
            frame_src,
            direct_link,
            share_link,
        } => {
            let mut lines = vec![
                PREVIEW_HEADING.to_string(),
                format!("  [frame] {frame_src}"),
                format!("  {OPEN_LINK_LABEL} {direct_link}"),
            ];
            if let Some(share) = share_link {
                lines.push(format!("  {SHARE_LINK_LABEL} {share}"));
            }
            lines
        }
        OutputBlock::FixedCode(code) => {
            let mut lines = vec![FIXED_CODE_OPEN.to_string()];
            lines.extend(code.lines().map(ToOwned::to_owned));
            lines.push(FIXED_CODE_CLOSE.to_string());
            lines
        }
    }
}
