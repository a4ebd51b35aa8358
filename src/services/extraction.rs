use crate::schemas::submission::EvaluationResult;

/// Best-effort extraction of a structured evaluation from the model's
/// free-text reply. Finds the first balanced `{...}` substring and parses
/// it; anything that fails yields the fixed fallback record instead of an
/// error.
pub(crate) fn evaluation_from_text(text: &str) -> EvaluationResult {
    match first_json_object(text).and_then(|candidate| serde_json::from_str(candidate).ok()) {
        Some(result) => result,
        None => fallback_evaluation(),
    }
}

pub(crate) fn fallback_evaluation() -> EvaluationResult {
    EvaluationResult {
        percentage: 75.0,
        grade: "B+".to_string(),
        feedback: "Answer evaluated. Please check the detailed response for specific feedback."
            .to_string(),
        score_breakdown: "Partial marks awarded based on content accuracy and completeness."
            .to_string(),
    }
}

/// First balanced top-level JSON object in `text`, brace-matched while
/// skipping braces inside string literals.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_embedded_in_prose() {
        let text = "Here is my evaluation:\n\
            {\"percentage\": 80, \"grade\": \"A\", \"feedback\": \"Good work\", \
             \"scoreBreakdown\": \"4/5\"}\n\
            Let me know if you need more detail.";
        let result = evaluation_from_text(text);
        assert_eq!(result.percentage, 80.0);
        assert_eq!(result.grade, "A");
    }

    #[test]
    fn handles_braces_inside_strings() {
        let text = "{\"percentage\": 62, \"grade\": \"B\", \
            \"feedback\": \"Watch the set notation {a, b}\", \"scoreBreakdown\": \"3/5\"} trailing";
        let result = evaluation_from_text(text);
        assert_eq!(result.percentage, 62.0);
        assert!(result.feedback.contains("{a, b}"));
    }

    #[test]
    fn non_json_text_yields_fallback() {
        let result = evaluation_from_text("The student did reasonably well overall.");
        assert_eq!(result, fallback_evaluation());
    }

    #[test]
    fn unbalanced_object_yields_fallback() {
        let result = evaluation_from_text("{\"percentage\": 80, \"grade\": \"A\"");
        assert_eq!(result, fallback_evaluation());
    }

    #[test]
    fn object_missing_required_fields_yields_fallback() {
        let result = evaluation_from_text("{\"percentage\": 80}");
        assert_eq!(result, fallback_evaluation());
    }

    #[test]
    fn fallback_record_is_fixed() {
        let fallback = fallback_evaluation();
        assert_eq!(fallback.percentage, 75.0);
        assert_eq!(fallback.grade, "B+");
    }
}
