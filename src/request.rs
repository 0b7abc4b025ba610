//! Request assembly for the `generateContent` call.

use crate::asset::EncodedImage;
use serde::Serialize;

/// Wire payload for one `generateContent` call.
///
/// Part order is significant: the instruction text comes first, followed by
/// each image part in input order (first/second order carries combination
/// semantics).
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

/// A part in the request - either text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateContentRequest {
    /// Assembles a payload from an instruction and zero-to-N encoded images.
    ///
    /// Pure and infallible; callers validate inputs (non-empty instruction,
    /// well-formed encodings) before assembly.
    pub fn assemble(instruction: &str, images: &[EncodedImage]) -> Self {
        let mut parts = Vec::with_capacity(1 + images.len());

        parts.push(RequestPart::Text {
            text: instruction.to_string(),
        });

        for image in images {
            parts.push(RequestPart::Inline {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.base64_data.clone(),
                },
            });
        }

        Self {
            contents: vec![Content { parts }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(mime: &str, data: &str) -> EncodedImage {
        EncodedImage {
            mime_type: mime.into(),
            base64_data: data.into(),
        }
    }

    #[test]
    fn test_text_only_payload() {
        let req = GenerateContentRequest::assemble("A puppy", &[]);

        assert_eq!(req.contents.len(), 1);
        assert_eq!(req.contents[0].parts.len(), 1);
        assert!(matches!(&req.contents[0].parts[0], RequestPart::Text { text } if text == "A puppy"));
    }

    #[test]
    fn test_instruction_precedes_images_in_input_order() {
        let first = encoded("image/png", "Zmlyc3Q=");
        let second = encoded("image/jpeg", "c2Vjb25k");
        let req = GenerateContentRequest::assemble("blend these", &[first, second]);

        let parts = &req.contents[0].parts;
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], RequestPart::Text { .. }));

        match &parts[1] {
            RequestPart::Inline { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, "Zmlyc3Q=");
            }
            other => panic!("expected inline part, got {other:?}"),
        }
        match &parts[2] {
            RequestPart::Inline { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/jpeg");
                assert_eq!(inline_data.data, "c2Vjb25k");
            }
            other => panic!("expected inline part, got {other:?}"),
        }
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let image = encoded("image/png", "iVBORw0KGgo=");
        let req = GenerateContentRequest::assemble("Edit this", &[image]);
        let json = serde_json::to_value(&req).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Edit this");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "iVBORw0KGgo=");
        assert!(parts[1].get("inline_data").is_none());
    }
}
