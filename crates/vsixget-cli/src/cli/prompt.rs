//! Interactive version prompt.

use dialoguer::Input;
use vsixget_core::version::VersionPrompt;

/// Asks on the terminal; a blank answer means "latest".
pub struct TerminalPrompt;

impl VersionPrompt for TerminalPrompt {
    fn ask(&self) -> anyhow::Result<String> {
        let answer = Input::<String>::new()
            .with_prompt("Enter version (leave blank for latest)")
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}
