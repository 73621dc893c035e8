// src/codegen/sink.rs

//! 생성된 코드를 받아가는 출력 대상

use std::io;

use crate::error::Result;

pub trait CodeSink {
    fn write_code(&mut self, code: &str) -> Result<()>;
}

impl CodeSink for String {
    fn write_code(&mut self, code: &str) -> Result<()> {
        self.push_str(code);
        Ok(())
    }
}

/// `log::info!`로 한 줄씩 출력
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl CodeSink for LogSink {
    fn write_code(&mut self, code: &str) -> Result<()> {
        for line in code.lines() {
            log::info!("{}", line);
        }
        Ok(())
    }
}

/// 임의의 `io::Write` 대상 (stdout, 파일 등)
pub struct IoSink<W: io::Write>(pub W);

impl<W: io::Write> CodeSink for IoSink<W> {
    fn write_code(&mut self, code: &str) -> Result<()> {
        self.0.write_all(code.as_bytes())?;
        self.0.write_all(b"\n")?;
        self.0.flush()?;
        Ok(())
    }
}
