//! 사용자 확인 입력 포트 구현 어댑터.

use std::io::{self, Write};

use anyhow::Result;

use crate::application::ports::UserConfirmer;

/// stdin으로 y/yes 확인을 받는 어댑터. EOF나 빈 입력은 거절로 본다.
pub struct StdinConfirmer;

impl UserConfirmer for StdinConfirmer {
    fn confirm(&self, message: &str) -> Result<bool> {
        eprint!("{message} [y/N]: ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
