/// Pull the JSON payload out of free model text.
///
/// Order: the first fenced block (```` ```json ```` or a bare fence), then
/// the span from the first `{` to the last `}`, then the trimmed text as-is.
/// The result is only a candidate; parsing decides whether it is usable.
pub fn extract_json(text: &str) -> &str {
    if let Some(fenced) = fenced_block(text) {
        return fenced;
    }

    if let (Some(open), Some(close)) = (text.find('{'), text.rfind('}'))
        && close > open
    {
        return &text[open..=close];
    }

    text.trim()
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let mut body = &text[start + 3..];
    if let Some(rest) = body.strip_prefix("json") {
        body = rest;
    }
    let end = body.find("```")?;
    let candidate = body[..end].trim();
    (!candidate.is_empty()).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_json_fence() {
        let text = "Вот план:\n```json\n{\"a\": 1}\n```\nУдачи!";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn accepts_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn first_fence_wins() {
        let text = "```json\n{\"first\": true}\n```\n```json\n{\"second\": true}\n```";
        assert_eq!(extract_json(text), "{\"first\": true}");
    }

    #[test]
    fn falls_back_to_brace_span_in_prose() {
        let text = "Sure! {\"outer\": {\"inner\": 1}} Hope this helps.";
        assert_eq!(extract_json(text), "{\"outer\": {\"inner\": 1}}");
    }

    #[test]
    fn unterminated_fence_uses_brace_span() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn raw_text_is_returned_trimmed() {
        assert_eq!(extract_json("  [1, 2, 3]\n"), "[1, 2, 3]");
        assert_eq!(extract_json("no json here"), "no json here");
    }

    #[test]
    fn reversed_braces_are_not_a_span() {
        assert_eq!(extract_json("} oops {"), "} oops {");
    }
}
