//! 외부 명령 실행 설정 유틸리티.

use std::env;
use std::path::Path;

use anyhow::{Result, anyhow, bail};

/// 셸 인용 규칙으로 명령 문자열을 프로그램과 인자로 나눈다.
pub fn split_command(command: &str) -> Result<(String, Vec<String>)> {
    let mut parts = shlex::split(command)
        .ok_or_else(|| anyhow!("unbalanced quotes in command `{command}`"))?
        .into_iter();
    let Some(program) = parts.next() else {
        bail!("command is empty");
    };
    Ok((program, parts.collect()))
}

/// 프로그램이 실행 가능한 위치에 있는지 확인한다.
pub fn command_exists(program: &str) -> bool {
    if program.trim().is_empty() {
        return false;
    }

    // 경로가 주어지면 파일 존재만 본다.
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.is_file();
    }

    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&path_var).any(|dir| {
        if dir.join(program).is_file() {
            return true;
        }
        cfg!(windows)
            && path.extension().is_none()
            && [".exe", ".cmd", ".bat"]
                .iter()
                .any(|ext| dir.join(format!("{program}{ext}")).is_file())
    })
}
