use std::fmt::Write;

use crate::schemas::paper::GeneratePaperRequest;

/// Render a generation specification into the paper-generation prompt.
/// Pure string construction, no side effects.
pub(crate) fn generation_prompt(spec: &GeneratePaperRequest) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Generate a comprehensive question paper with the following specifications:"
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Subject: {}", spec.subject);
    let _ = writeln!(prompt, "Class: {}", spec.class_name);
    let _ = writeln!(prompt, "Total Marks: {}", spec.total_marks);
    let _ = writeln!(prompt, "Difficulty Level: {}", spec.difficulty);
    let _ = writeln!(prompt, "Board: {}", spec.board);
    let _ = writeln!(prompt, "Chapters: {}", spec.chapters.join(", "));
    if let Some(topic) = spec.specific_topic.as_deref().filter(|value| !value.is_empty()) {
        let _ = writeln!(prompt, "Specific Topic: {topic}");
    }
    if let Some(instructions) = spec.instructions.as_deref().filter(|value| !value.is_empty()) {
        let _ = writeln!(prompt, "Special Instructions: {instructions}");
    }
    let _ = writeln!(prompt, "Paper Pattern: {}", spec.paper_pattern);
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Please create a well-structured question paper in markdown format with:");
    let _ = writeln!(prompt, "1. Header with subject, class, time duration, and marks");
    let _ = writeln!(prompt, "2. Clear instructions for students");
    let _ = writeln!(prompt, "3. Questions divided by marks (1, 2, 3, 5, 10 marks etc.)");
    let _ = writeln!(prompt, "4. Proper numbering and formatting");
    let _ = writeln!(prompt, "5. Include a mix of question types based on the pattern specified");
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Make sure the total marks add up to exactly {} marks.",
        spec.total_marks
    );

    prompt
}

/// Render an answer-evaluation prompt. The JSON schema and the grading scale
/// are instructions to the model, not anything enforced locally.
pub(crate) fn evaluation_prompt(
    question: &str,
    expected_answer: &str,
    student_answer: &str,
    max_marks: i32,
) -> String {
    format!(
        "Please evaluate the following student response carefully:\n\
         \n\
         Question: {question}\n\
         Model/Expected Answer: {expected_answer}\n\
         Student Answer: {student_answer}\n\
         Maximum Marks: {max_marks}\n\
         \n\
         Please provide a detailed evaluation in the following JSON format:\n\
         {{\n\
           \"percentage\": [percentage score out of 100],\n\
           \"grade\": \"[A+/A/B+/B/C+/C/D/F based on percentage]\",\n\
           \"feedback\": \"[detailed constructive feedback explaining what was correct, what was missing, and suggestions for improvement]\",\n\
           \"scoreBreakdown\": \"[breakdown of marks awarded for different aspects of the answer]\"\n\
         }}\n\
         \n\
         Grading scale:\n\
         90-100%: A+\n\
         80-89%: A\n\
         70-79%: B+\n\
         60-69%: B\n\
         50-59%: C+\n\
         40-49%: C\n\
         30-39%: D\n\
         Below 30%: F\n\
         \n\
         Be fair but constructive in your evaluation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> GeneratePaperRequest {
        serde_json::from_value(serde_json::json!({
            "subject": "Chemistry",
            "class": "12B",
            "totalMarks": 70,
            "difficulty": "hard",
            "board": "ICSE",
            "chapters": ["Electrochemistry", "Polymers"],
            "paperPattern": "board exam"
        }))
        .expect("spec")
    }

    #[test]
    fn generation_prompt_lists_spec_fields() {
        let prompt = generation_prompt(&sample_spec());
        assert!(prompt.contains("Subject: Chemistry"));
        assert!(prompt.contains("Class: 12B"));
        assert!(prompt.contains("Chapters: Electrochemistry, Polymers"));
        assert!(prompt.contains("Paper Pattern: board exam"));
        assert!(prompt.contains("add up to exactly 70 marks"));
    }

    #[test]
    fn generation_prompt_skips_empty_optional_sections() {
        let prompt = generation_prompt(&sample_spec());
        assert!(!prompt.contains("Specific Topic:"));
        assert!(!prompt.contains("Special Instructions:"));
    }

    #[test]
    fn generation_prompt_includes_optional_sections_when_set() {
        let mut spec = sample_spec();
        spec.specific_topic = Some("Nernst equation".to_string());
        spec.instructions = Some("Include two numericals".to_string());

        let prompt = generation_prompt(&spec);
        assert!(prompt.contains("Specific Topic: Nernst equation"));
        assert!(prompt.contains("Special Instructions: Include two numericals"));
    }

    #[test]
    fn evaluation_prompt_states_schema_and_scale() {
        let prompt = evaluation_prompt("Define osmosis.", "N/A", "Movement of water", 5);
        assert!(prompt.contains("Question: Define osmosis."));
        assert!(prompt.contains("Maximum Marks: 5"));
        assert!(prompt.contains("\"scoreBreakdown\""));
        assert!(prompt.contains("90-100%: A+"));
        assert!(prompt.contains("Below 30%: F"));
    }
}
