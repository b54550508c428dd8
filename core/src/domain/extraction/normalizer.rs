const FENCE: &str = "```";

/// Strips a Markdown code fence wrapped around a model reply.
///
/// The opening line (with its optional language tag) is dropped, and the
/// closing line too when it is a fence. Stripping repeats while the result
/// still opens with a fence, so the output is a fixed point.
pub fn normalize(text: &str) -> String {
    let mut current = text.trim().to_string();
    while let Some(stripped) = strip_fence(&current) {
        current = stripped;
    }
    current
}

fn strip_fence(text: &str) -> Option<String> {
    if !text.starts_with(FENCE) {
        return None;
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return None;
    }

    let body = if lines[lines.len() - 1].starts_with(FENCE) {
        &lines[1..lines.len() - 1]
    } else {
        &lines[1..]
    };

    Some(body.join("\n").trim().to_string())
}
