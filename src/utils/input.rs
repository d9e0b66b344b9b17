/// Make text safe to place in the input box or print to the terminal.
///
/// Newlines survive, `\r\n` and lone `\r` become `\n`, tabs expand to four
/// spaces, and every other control character is dropped. That includes ESC,
/// so no escape sequence from a reply or a paste ever reaches the terminal.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                sanitized.push('\n');
            }
            '\n' => sanitized.push(c),
            _ if !c.is_control() => sanitized.push(c),
            _ => {}
        }
    }

    sanitized
}
