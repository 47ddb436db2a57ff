#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewlineStyle {
    Crlf,
    Cr,
    Lf,
}

impl NewlineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineStyle::Crlf => "\r\n",
            NewlineStyle::Cr => "\r",
            NewlineStyle::Lf => "\n",
        }
    }
}

/// Most frequent terminator wins; ties break CRLF > CR > LF. A sequence with
/// no recognized terminator at all defaults to LF.
pub fn detect_newline(lines: &[String]) -> NewlineStyle {
    let mut crlf = 0usize;
    let mut cr = 0usize;
    let mut lf = 0usize;

    // CRLF checked first so its lines are not counted as LF too
    for line in lines {
        if line.ends_with("\r\n") {
            crlf += 1;
        } else if line.ends_with('\r') {
            cr += 1;
        } else if line.ends_with('\n') {
            lf += 1;
        }
    }

    if crlf == 0 && cr == 0 && lf == 0 {
        NewlineStyle::Lf
    } else if crlf >= cr && crlf >= lf {
        NewlineStyle::Crlf
    } else if cr >= lf {
        NewlineStyle::Cr
    } else {
        NewlineStyle::Lf
    }
}

/// Split into lines that keep their terminators, recognizing CRLF, CR and LF.
pub fn split_lines(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(text[start..=idx].to_string());
                idx += 1;
                start = idx;
            }
            b'\r' => {
                let end = if bytes.get(idx + 1) == Some(&b'\n') {
                    idx + 1
                } else {
                    idx
                };
                lines.push(text[start..=end].to_string());
                idx = end + 1;
                start = idx;
            }
            _ => idx += 1,
        }
    }

    if start < bytes.len() {
        lines.push(text[start..].to_string());
    }

    lines
}

pub fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
