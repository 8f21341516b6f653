//! AI content augmentation.
//!
//! Runs before assembly and only touches slide text:
//!
//! 1. slides with rewrite instructions get their content rewritten,
//! 2. an [`AutoGenerate`] request replaces all sections with generated slides,
//! 3. every slide gets improvement tips as speaker notes.
//!
//! The model behind it is a [`ContentGenerator`]; the `openai` feature
//! provides one backed by the OpenAI chat-completions API.

#[cfg(feature = "openai")]
pub mod openai;

use crate::deck::{AutoGenerate, LayoutKind, PresentationRequest, Section, SlideSpec};
use serde::Deserialize;
use thiserror::Error;

#[cfg(feature = "openai")]
pub use openai::OpenAiGenerator;

pub const AUTO_SECTION_TITLE: &str = "Auto-Generated Slides";
pub const NO_CONTENT_TIPS: &str = "No content provided for improvement tips.";

const TIPS_PROMPT: &str = "Based on the following slide content, provide improvement tips to enhance clarity, engagement, and design:\n";

/// Errors raised by a content generator.
#[derive(Error, Debug)]
pub enum AugmentError {
    /// Missing or invalid generator configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request to the model failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The model answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A text model that answers prompts.
pub trait ContentGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AugmentError>;
}

/// Run all augmentation steps in order.
///
/// Returns user-facing warnings; generator failures abort with an error.
pub fn augment(
    request: &mut PresentationRequest,
    generator: &dyn ContentGenerator,
) -> Result<Vec<String>, AugmentError> {
    let mut warnings = Vec::new();

    let rewritten = rewrite_slides(request, generator)?;
    if rewritten > 0 {
        log::info!("Rewrote {} slides", rewritten);
    }

    if let Some(auto) = request.auto_generate.take() {
        let (contents, warning) = generate_slide_contents(&auto, generator)?;
        warnings.extend(warning);
        request.sections = vec![auto_section(contents)];
    }

    add_improvement_tips(request, generator)?;
    Ok(warnings)
}

/// Rewrite every slide that has instructions and content. Returns the number
/// of rewritten slides.
pub fn rewrite_slides(
    request: &mut PresentationRequest,
    generator: &dyn ContentGenerator,
) -> Result<usize, AugmentError> {
    let mut count = 0;
    for slide in request.slides_mut() {
        let Some(instructions) = slide.instructions.as_deref() else {
            continue;
        };
        if slide.content.is_empty() || instructions.is_empty() {
            continue;
        }
        let prompt = format!(
            "Context:\n{}\n\nInstructions:\n{}",
            slide.content, instructions
        );
        slide.content = generator.generate(&prompt)?;
        count += 1;
    }
    Ok(count)
}

/// Ask for `auto.count` slide contents.
///
/// A malformed answer is not an error: it is logged, reported as a warning
/// and replaced by empty contents.
pub fn generate_slide_contents(
    auto: &AutoGenerate,
    generator: &dyn ContentGenerator,
) -> Result<(Vec<String>, Option<String>), AugmentError> {
    let prompt = format!(
        "Context:\n{}\n\nInstructions:\n{}\n\nPlease generate exactly {} slide contents for a PowerPoint presentation \
         as a JSON array of strings. Each string should correspond to the content for one slide. \
         Do not include any additional text.",
        auto.context, auto.instructions, auto.count
    );
    let answer = generator.generate(&prompt)?;

    match parse_slide_contents(&answer, auto.count) {
        Ok(contents) => Ok((contents, None)),
        Err(err) => {
            log::error!("Error parsing AI output as JSON: {}", err);
            let warning = format!("Error parsing AI output as JSON: {}", err);
            Ok((vec![String::new(); auto.count], Some(warning)))
        },
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlideContents {
    Object { content: Vec<String> },
    Array(Vec<String>),
}

fn parse_slide_contents(answer: &str, expected: usize) -> Result<Vec<String>, AugmentError> {
    let json = strip_code_fence(answer.trim());
    let contents = match serde_json::from_str::<SlideContents>(json)
        .map_err(|e| AugmentError::InvalidResponse(e.to_string()))?
    {
        SlideContents::Object { content } => content,
        SlideContents::Array(content) => content,
    };

    if contents.len() != expected {
        return Err(AugmentError::InvalidResponse(format!(
            "expected {} slides, got {}",
            expected,
            contents.len()
        )));
    }
    Ok(contents)
}

/// Models often wrap JSON in a Markdown code fence.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn auto_section(contents: Vec<String>) -> Section {
    Section {
        title: AUTO_SECTION_TITLE.to_string(),
        header_image: None,
        slides: contents
            .into_iter()
            .map(|content| SlideSpec {
                content,
                ..SlideSpec::with_layout(LayoutKind::TitleAndContent)
            })
            .collect(),
    }
}

/// Fill every slide's notes with improvement tips for its content.
pub fn add_improvement_tips(
    request: &mut PresentationRequest,
    generator: &dyn ContentGenerator,
) -> Result<(), AugmentError> {
    for slide in request.slides_mut() {
        let content = slide.content.trim();
        slide.notes = if content.is_empty() {
            NO_CONTENT_TIPS.to_string()
        } else {
            generator.generate(&format!("{}{}", TIPS_PROMPT, content))?
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Answers prompts from a queue and records them.
    struct ScriptedGenerator {
        answers: RefCell<Vec<String>>,
        prompts: RefCell<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().rev().map(|s| s.to_string()).collect()),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ContentGenerator for ScriptedGenerator {
        fn generate(&self, prompt: &str) -> Result<String, AugmentError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.answers
                .borrow_mut()
                .pop()
                .ok_or_else(|| AugmentError::Request("no more answers".to_string()))
        }
    }

    fn request(contents: &[(&str, Option<&str>)]) -> PresentationRequest {
        PresentationRequest {
            sections: vec![Section {
                title: "S".to_string(),
                header_image: None,
                slides: contents
                    .iter()
                    .map(|(content, instructions)| SlideSpec {
                        content: content.to_string(),
                        instructions: instructions.map(str::to_string),
                        ..Default::default()
                    })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_rewrite_only_with_instructions_and_content() {
        let generator = ScriptedGenerator::new(&["Better text"]);
        let mut req = request(&[("Old", Some("Shorter")), ("Keep", None), ("", Some("Ignored"))]);
        assert_eq!(rewrite_slides(&mut req, &generator).unwrap(), 1);

        let slides = &req.sections[0].slides;
        assert_eq!(slides[0].content, "Better text");
        assert_eq!(slides[1].content, "Keep");
        assert_eq!(
            generator.prompts.borrow()[0],
            "Context:\nOld\n\nInstructions:\nShorter"
        );
    }

    #[test]
    fn test_tips_are_verbatim() {
        let generator = ScriptedGenerator::new(&["Use bullets.\nAdd a chart."]);
        let mut req = request(&[("  Revenue  ", None), ("   ", None)]);
        add_improvement_tips(&mut req, &generator).unwrap();

        let slides = &req.sections[0].slides;
        assert_eq!(slides[0].notes, "Use bullets.\nAdd a chart.");
        assert_eq!(slides[1].notes, NO_CONTENT_TIPS);
        assert!(generator.prompts.borrow()[0].ends_with("design:\nRevenue"));
    }

    #[test]
    fn test_auto_generate_accepts_object_and_array() {
        let auto = AutoGenerate {
            count: 2,
            ..Default::default()
        };
        let generator = ScriptedGenerator::new(&[r#"{"content": ["a", "b"]}"#, "```json\n[\"c\", \"d\"]\n```"]);
        let (first, warning) = generate_slide_contents(&auto, &generator).unwrap();
        assert_eq!(first, vec!["a", "b"]);
        assert!(warning.is_none());
        let (second, _) = generate_slide_contents(&auto, &generator).unwrap();
        assert_eq!(second, vec!["c", "d"]);
        assert!(generator.prompts.borrow()[0].contains("exactly 2 slide contents"));
    }

    #[test]
    fn test_auto_generate_fallback() {
        let auto = AutoGenerate {
            count: 3,
            ..Default::default()
        };
        for answer in ["not json", r#"["only one"]"#] {
            let generator = ScriptedGenerator::new(&[answer]);
            let (contents, warning) = generate_slide_contents(&auto, &generator).unwrap();
            assert_eq!(contents, vec![String::new(); 3]);
            assert!(warning.unwrap().starts_with("Error parsing AI output as JSON"));
        }
    }

    #[test]
    fn test_augment_order() {
        let generator = ScriptedGenerator::new(&["rewritten", r#"["x", ""]"#, "tips for x"]);
        let mut req = request(&[("Old", Some("Rewrite"))]);
        req.auto_generate = Some(AutoGenerate {
            context: "ctx".to_string(),
            instructions: "two slides".to_string(),
            count: 2,
        });

        let warnings = augment(&mut req, &generator).unwrap();
        assert!(warnings.is_empty());
        assert!(req.auto_generate.is_none());
        assert_eq!(req.sections.len(), 1);
        assert_eq!(req.sections[0].title, AUTO_SECTION_TITLE);

        let slides = &req.sections[0].slides;
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].layout, LayoutKind::TitleAndContent.index());
        assert_eq!(slides[0].notes, "tips for x");
        assert_eq!(slides[1].notes, NO_CONTENT_TIPS);
        assert_eq!(generator.prompts.borrow().len(), 3);
    }

    #[test]
    fn test_generator_error_propagates() {
        let generator = ScriptedGenerator::new(&[]);
        let mut req = request(&[("Content", None)]);
        assert!(matches!(
            augment(&mut req, &generator),
            Err(AugmentError::Request(_))
        ));
    }
}
