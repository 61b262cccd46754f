//! Adapter layer: pull the model's text out of a Gemini response

use super::dto;
use crate::recognition::domain::ServiceError;

/// Concatenate the text parts of the first candidate.
pub fn response_text(response: dto::GenerateContentResponse) -> Result<String, ServiceError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ServiceError::InvalidResponse(format!(
            "prompt blocked: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::InvalidResponse("no candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .unwrap_or_default()
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(parts: &[&str]) -> dto::GenerateContentResponse {
        dto::GenerateContentResponse {
            candidates: vec![dto::Candidate {
                content: Some(dto::Content {
                    parts: parts
                        .iter()
                        .map(|t| dto::Part {
                            text: Some(t.to_string()),
                            ..Default::default()
                        })
                        .collect(),
                    role: Some("model".to_string()),
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    #[test]
    fn test_joins_text_parts() {
        let text = response_text(response(&["{\"albumTitle\":", " \"X\"}"])).unwrap();
        assert_eq!(text, "{\"albumTitle\": \"X\"}");
    }

    #[test]
    fn test_no_candidates() {
        let empty = dto::GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: None,
        };
        assert!(matches!(
            response_text(empty),
            Err(ServiceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_blocked_prompt() {
        let mut blocked = response(&["ignored"]);
        blocked.prompt_feedback = Some(dto::PromptFeedback {
            block_reason: Some("SAFETY".to_string()),
        });
        let err = response_text(blocked).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
