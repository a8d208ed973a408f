use super::variant::{ContextPolicy, Persona, PromptStyle};

/// Simplifying persona, context offered as background.
pub const WORKING_PROMPT: &str = r#"You are a professor and expert in explaining complex topics in a way that is easy to understand.
Your job is to answer the provided question so that even a 5 year old can understand it.
You have provided with relevant background context to answer the question.

Question: {question}

Context: {context}

Answer:"#;

/// Technical persona, context offered as background.
pub const BUGGY_PROMPT: &str = r#"You are a professor and expert in complex technical communication.
Your job is to answer the provided question as precisely as possible, using technical language with maximal detail.
You have provided with relevant background context to answer the question.

Question: {question}

Context: {context}

Answer:"#;

/// Simplifying persona that must refuse without context.
pub const FLAKY_PROMPT: &str = r#"You are a professor and expert in explaining complex topics in a way that is easy to understand.
You must use the provided context to answer the question. If no context is available, refuse to answer the question to avoid hallucination.

Question: {question}

Context: {context}

Answer:"#;

/// Technical persona that must refuse without context.
const TECHNICAL_STRICT_PROMPT: &str = r#"You are a professor and expert in complex technical communication.
You must use the provided context to answer the question as precisely as possible, using technical language with maximal detail. If no context is available, refuse to answer the question to avoid hallucination.

Question: {question}

Context: {context}

Answer:"#;

/// Returns the template for a prompt style.
pub fn template(style: PromptStyle) -> &'static str {
    match (style.persona, style.context_policy) {
        (Persona::Simplifying, ContextPolicy::Background) => WORKING_PROMPT,
        (Persona::Technical, ContextPolicy::Background) => BUGGY_PROMPT,
        (Persona::Simplifying, ContextPolicy::RefuseWithoutContext) => FLAKY_PROMPT,
        (Persona::Technical, ContextPolicy::RefuseWithoutContext) => TECHNICAL_STRICT_PROMPT,
    }
}

/// Builds the explain prompt for a question and its joined context.
pub fn build_explain_prompt(style: PromptStyle, question: &str, context: &str) -> String {
    render(template(style), &[("question", question), ("context", context)])
}

/// Fills `{name}` placeholders in `template` from `vars`.
///
/// Only the template is scanned, so braces inside substituted values are
/// left alone. Unknown placeholders are kept verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
