//! System instructions and prompt templates.

/// Plan stage: reason about the content, never write it.
pub const REASONING_SYSTEM_PROMPT: &str = "You are a strategic assistant. Your job is to reason through how a piece of content should be written.
First, explain the purpose of the output. Then, explain how it should be structured or styled.
Focus on providing a clear and detailed explanation, not writing the content itself.";

/// Write stage: produce the content directly.
pub const GENERATION_SYSTEM_PROMPT: &str = "You are a helpful assistant and skilled writer. Generate content based on the prompt or structure you're given.";

pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful assistant who answers questions based only on the context provided.";

/// Number of looked-up chunks injected into an answer prompt.
pub const MAX_CONTEXT_CHUNKS: usize = 5;

/// Wraps `text` in double quotes with Go-style escapes: `\xNN` for ASCII
/// control bytes, `\uNNNN`/`\UNNNNNNNN` for other control characters.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32))
            }
            c if c.is_control() && (c as u32) < 0x10000 => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            c if c.is_control() => out.push_str(&format!("\\U{:08x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn documentation_plan_prompt(topic: &str) -> String {
    format!(
        "You're tasked with planning technical documentation.
The user provided this context: {}

Your job is to describe:
- What the documentation should include
- What order it should be in
- Why this structure makes sense
- Any examples or special formatting worth including

Do not write the documentation, just explain how it should be written and why.",
        quote(topic)
    )
}

pub fn documentation_write_prompt(plan: &str) -> String {
    format!(
        "You're writing documentation based on the following detailed plan:

{}

Please write clear, concise, and well-structured documentation according to the above. Use markdown formatting where appropriate.",
        plan
    )
}

/// Renders the first [`MAX_CONTEXT_CHUNKS`] snippets as `- <text>` lines, in the given order.
pub fn context_block<'a, I>(snippets: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    snippets
        .into_iter()
        .take(MAX_CONTEXT_CHUNKS)
        .map(|text| format!("- {}\n", text))
        .collect()
}

pub fn answer_prompt(context: &str, query: &str) -> String {
    format!("Here is some context:\n{}\n\nQuestion: {}", context, query)
}
