//! 콘솔 리포터 포트 구현 어댑터.

use std::io::{self, IsTerminal};

use crossterm::style::Stylize;

use crate::application::ports::Reporter;

/// 상태 메시지는 stderr, 명령 결과(`raw`)는 stdout으로 쓴다.
pub struct ConsoleReporter {
    colored: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    /// stderr가 TTY일 때만 색을 쓴다.
    pub fn new() -> Self {
        Self {
            colored: io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, name: &str) {
        if self.colored {
            eprintln!("\n{}", format!("== {name} ==").bold());
        } else {
            eprintln!("\n== {name} ==");
        }
    }

    fn kv(&self, key: &str, value: &str) {
        eprintln!("{:<12}: {}", key, value);
    }

    fn success(&self, message: &str) {
        if self.colored {
            eprintln!("{} {message}", "✔".green());
        } else {
            eprintln!("[ok] {message}");
        }
    }

    fn warn(&self, message: &str) {
        if self.colored {
            eprintln!("{} {message}", "!".yellow().bold());
        } else {
            eprintln!("[warn] {message}");
        }
    }

    fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {message}", "error:".red().bold());
        } else {
            eprintln!("error: {message}");
        }
    }

    fn raw(&self, line: &str) {
        println!("{}", line);
    }
}
