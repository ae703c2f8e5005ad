use paper_grill::gateway::build_prompt;
use paper_grill::gateway::types::{
    Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
};

#[test]
fn prompt_contains_question_and_base_instructions() {
    let p = build_prompt("What was the sample size?", None);
    assert!(p.contains("please answer this question: What was the sample size?"));
    assert!(p.contains("concise but comprehensive"));
    assert!(!p.contains("Additional instructions:"));
}

#[test]
fn prompt_appends_additional_instructions() {
    let p = build_prompt("Q", Some("quote the paper"));
    assert!(p.contains("Additional instructions: quote the paper"));
}

#[test]
fn request_serializes_to_gemini_wire_shape() {
    let req = GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData(InlineData {
                    mime_type: "application/pdf".to_string(),
                    data: "QkFTRTY0".to_string(),
                }),
                Part::Text("prompt".to_string()),
            ],
        }],
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(
        json["contents"][0]["parts"][0]["inlineData"]["mimeType"],
        "application/pdf"
    );
    assert_eq!(json["contents"][0]["parts"][1]["text"], "prompt");
}

#[test]
fn response_text_is_extracted_from_first_candidate() {
    let raw = r#"{
        "candidates": [
            {"content": {"parts": [{"text": "short "}, {"text": "answer"}]}}
        ]
    }"#;
    let resp: GenerateContentResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.first_text().as_deref(), Some("short answer"));
}

#[test]
fn empty_candidates_yield_no_text() {
    let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.first_text().is_none());
}
