// RLM Log Reader - core/text.rs
//
// Line tokenisation and small string helpers shared by the parser stages.

/// Split `input` on any character in `delimiters`.
///
/// Runs of delimiters are collapsed, so leading, trailing, and repeated
/// delimiters never produce empty tokens. A token that begins with `"`
/// extends to the next `"` regardless of delimiters; the quotes themselves
/// are dropped (so `""` yields an empty token). An unterminated quote runs
/// to the end of the input.
///
/// Delimiters are expected to be ASCII.
pub fn tokenize(input: &str, delimiters: &str) -> Vec<String> {
    let bytes = input.as_bytes();
    let delims = delimiters.as_bytes();
    let is_delim = |b: u8| delims.contains(&b);

    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && is_delim(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        if bytes[pos] == b'"' {
            let start = pos + 1;
            match input[start..].find('"') {
                Some(offset) => {
                    tokens.push(input[start..start + offset].to_string());
                    pos = start + offset + 1;
                }
                None => {
                    tokens.push(input[start..].to_string());
                    break;
                }
            }
        } else {
            let start = pos;
            while pos < bytes.len() && !is_delim(bytes[pos]) {
                pos += 1;
            }
            tokens.push(input[start..pos].to_string());
        }
    }

    tokens
}

/// Tokenise every line on spaces. Blank lines produce empty rows so row
/// indices stay aligned with line numbers.
pub fn tokenize_lines(lines: &[String]) -> Vec<Vec<String>> {
    lines.iter().map(|line| tokenize(line, " ")).collect()
}

/// Append `item` to `list` unless it is already present.
/// Preserves first-seen order.
pub fn push_unique(item: &str, list: &mut Vec<String>) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}

/// File name without directories or the final extension.
///
/// Both `/` and `\` count as separators so Windows paths typed into the
/// GUI behave the same on every platform.
pub fn file_stem(path: &str) -> String {
    let name = match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    };
    match name.rfind('.') {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

/// Parse the leading decimal digits of `s`, ignoring leading whitespace.
/// Returns 0 when there are none, like C `atoi` on log counters.
pub fn leading_number(s: &str) -> u64 {
    s.trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        })
}
