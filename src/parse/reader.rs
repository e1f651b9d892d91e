use std::{
    io::{BufRead, Error as IoError},
    str,
};

/// Line-based reader for `.osu` content.
///
/// Lines are kept as raw bytes so that sections the parser ignores may contain
/// invalid UTF-8 without failing the whole file.
pub(crate) struct FileReader<R> {
    inner: R,
    buf: Vec<u8>,
    line: usize,
}

impl<R: BufRead> FileReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(64),
            line: 0,
        }
    }

    /// Advance to the next line that is neither empty nor a comment.
    ///
    /// Returns `Ok(false)` once the input is exhausted.
    pub(crate) fn next_line(&mut self) -> Result<bool, IoError> {
        loop {
            self.buf.clear();

            if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(false);
            }

            self.line += 1;
            self.trim_end();

            if !skip_line(&self.buf) {
                return Ok(true);
            }
        }
    }
}

impl<R> FileReader<R> {
    /// One-based number of the current line.
    pub(crate) const fn line(&self) -> usize {
        self.line
    }

    /// Whether the current line consists of a BOM and whitespace only.
    pub(crate) fn is_initial_empty_line(&self) -> bool {
        let rest = self.buf.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&self.buf);

        rest.iter().all(u8::is_ascii_whitespace)
    }

    /// Parse the version of a `osu file format v<version>` line.
    ///
    /// `None` if the header is missing, `Some(None)` if the version is not a number.
    pub(crate) fn version(&self) -> Option<Option<u32>> {
        const OSU_FILE_HEADER: &[u8] = b"osu file format v";

        let idx = find(&self.buf, OSU_FILE_HEADER)?;
        let infix = &self.buf[idx + OSU_FILE_HEADER.len()..];
        let digits = infix.iter().take_while(|byte| byte.is_ascii_digit()).count();

        let version = str::from_utf8(&infix[..digits])
            .ok()
            .and_then(|n| n.parse().ok());

        Some(version)
    }

    /// Name of the section if the current line is a section header.
    pub(crate) fn get_section(&self) -> Option<&[u8]> {
        if self.buf.first() == Some(&b'[') {
            let end = self.buf.iter().position(|&byte| byte == b']')?;

            return Some(&self.buf[1..end]);
        }

        None
    }

    /// The current line without trailing comment, `None` if it's not valid UTF-8.
    pub(crate) fn get_line(&self) -> Option<&str> {
        let end = find(&self.buf, b"//").unwrap_or(self.buf.len());

        str::from_utf8(&self.buf[..end]).ok().map(str::trim_end)
    }

    /// Split a `Key: Value` line.
    pub(crate) fn split_colon(&self) -> Option<(&[u8], &str)> {
        let idx = self.buf.iter().position(|&byte| byte == b':')?;
        let mut front = &self.buf[..idx];

        while let [rest @ .., b' ' | b'\t'] = front {
            front = rest;
        }

        let back = str::from_utf8(&self.buf[idx + 1..]).ok()?;

        Some((front, back.trim()))
    }

    fn trim_end(&mut self) {
        while let Some(b'\n' | b'\r' | b' ' | b'\t' | b'\0') = self.buf.last() {
            self.buf.pop();
        }
    }
}

fn skip_line(line: &[u8]) -> bool {
    line.is_empty() || matches!(line[0], b' ' | b'_') || line.starts_with(b"//")
}

fn find(haystack: &[u8], pat: &[u8]) -> Option<usize> {
    haystack
        .windows(pat.len())
        .position(|window| window == pat)
}
