//! Per-field length bounds for anonymous submissions.
//!
//! A bound of 0 disables the check for that field. Lengths are measured in
//! characters, not bytes, so multi-byte scripts are not penalized.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configured maxima for the user-supplied submission fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordLimits {
    #[serde(default = "default_content")]
    pub content: usize,
    #[serde(default = "default_nick")]
    pub nick: usize,
    #[serde(default = "default_mail")]
    pub mail: usize,
    #[serde(default = "default_site")]
    pub site: usize,
}

fn default_content() -> usize {
    500
}

fn default_nick() -> usize {
    20
}

fn default_mail() -> usize {
    60
}

fn default_site() -> usize {
    120
}

impl Default for WordLimits {
    fn default() -> Self {
        Self {
            content: default_content(),
            nick: default_nick(),
            mail: default_mail(),
            site: default_site(),
        }
    }
}

impl WordLimits {
    /// Check every bounded field, reporting the first that exceeds its
    /// maximum. Runs before any write.
    pub fn check(&self, content: &str, nick: &str, mail: &str, site: &str) -> Result<()> {
        check_field("content", self.content, content)?;
        check_field("nick", self.nick, nick)?;
        check_field("mail", self.mail, mail)?;
        check_field("site", self.site, site)?;
        Ok(())
    }
}

fn check_field(name: &'static str, max: usize, value: &str) -> Result<()> {
    if max == 0 {
        return Ok(());
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(Error::quota(name, max, actual));
    }
    Ok(())
}
