//! Response interpretation for `generateContent` results.

use crate::error::{ForgeError, Result};
use base64::Engine;
use serde::Deserialize;
use std::path::Path;

/// Raw `generateContent` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// One interpreted part of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    /// A text remark from the model.
    Text(String),
    /// An inline image payload.
    Image(ResultImage),
}

/// An image returned by the model, still base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultImage {
    /// MIME type reported by the model.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub base64_data: String,
}

impl ResultImage {
    /// Returns the image as a displayable data URL.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }

    /// Decodes the base64 payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_data)
            .map_err(|e| ForgeError::Decode(e.to_string()))
    }

    /// Decodes and writes the image to the given path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.decode()?)?;
        Ok(())
    }
}

/// The usable content of a successful response.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// The resulting image, if the response carried one.
    pub image: Option<ResultImage>,
    /// A trailing text remark, if the response carried one.
    pub message: Option<String>,
}

impl GenerateContentResponse {
    /// Flattens the first candidate's content into an ordered part sequence.
    pub fn parts(&self) -> Vec<ResponsePart> {
        let Some(content) = self.candidates.first().and_then(|c| c.content.as_ref()) else {
            return Vec::new();
        };

        content
            .parts
            .iter()
            .filter_map(|part| {
                if let Some(inline) = &part.inline_data {
                    Some(ResponsePart::Image(ResultImage {
                        mime_type: inline.mime_type.clone(),
                        base64_data: inline.data.clone(),
                    }))
                } else {
                    part.text.clone().map(ResponsePart::Text)
                }
            })
            .collect()
    }

    /// Folds the response parts into an [`Outcome`].
    ///
    /// Later parts of the same kind overwrite earlier ones (last-image-wins,
    /// last-text-wins). A response with nothing usable is an
    /// [`ForgeError::EmptyResponse`], distinct from a transport failure.
    pub fn interpret(&self) -> Result<Outcome> {
        let mut outcome = Outcome::default();

        for part in self.parts() {
            match part {
                ResponsePart::Image(image) => outcome.image = Some(image),
                ResponsePart::Text(text) => outcome.message = Some(text),
            }
        }

        if outcome.image.is_none() && outcome.message.is_none() {
            return Err(ForgeError::EmptyResponse);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_deserialization_camel_case() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{
                            "inlineData": {
                                "mimeType": "image/png",
                                "data": "iVBORw0KGgo="
                            }
                        }]
                    }
                }]
            }"#,
        );

        let parts = resp.parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(
            parts[0],
            ResponsePart::Image(ResultImage {
                mime_type: "image/png".into(),
                base64_data: "iVBORw0KGgo=".into(),
            })
        );
    }

    #[test]
    fn test_interpret_image_yields_data_uri() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{
                            "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" }
                        }]
                    }
                }]
            }"#,
        );

        let outcome = resp.interpret().unwrap();
        let image = outcome.image.unwrap();
        assert_eq!(image.data_uri(), "data:image/png;base64,iVBORw0KGgo=");
        assert!(outcome.message.is_none());
    }

    #[test]
    fn test_interpret_text_only_is_success() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "I could not edit that image." }]
                    }
                }]
            }"#,
        );

        let outcome = resp.interpret().unwrap();
        assert!(outcome.image.is_none());
        assert_eq!(outcome.message.as_deref(), Some("I could not edit that image."));
    }

    #[test]
    fn test_last_image_wins() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            { "inlineData": { "mimeType": "image/png", "data": "Zmlyc3Q=" } },
                            { "inlineData": { "mimeType": "image/png", "data": "c2Vjb25k" } }
                        ]
                    }
                }]
            }"#,
        );

        let outcome = resp.interpret().unwrap();
        assert_eq!(outcome.image.unwrap().base64_data, "c2Vjb25k");
    }

    #[test]
    fn test_image_and_trailing_text() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } },
                            { "text": "Here is your edit." }
                        ]
                    }
                }]
            }"#,
        );

        let outcome = resp.interpret().unwrap();
        assert!(outcome.image.is_some());
        assert_eq!(outcome.message.as_deref(), Some("Here is your edit."));
    }

    #[test]
    fn test_no_candidates_is_empty_response() {
        let resp = parse(r#"{ "candidates": [] }"#);
        assert!(matches!(
            resp.interpret().unwrap_err(),
            ForgeError::EmptyResponse
        ));
    }

    #[test]
    fn test_candidate_without_content_is_empty_response() {
        let resp = parse(r#"{ "candidates": [{}] }"#);
        assert!(matches!(
            resp.interpret().unwrap_err(),
            ForgeError::EmptyResponse
        ));
    }

    #[test]
    fn test_unusable_parts_are_empty_response() {
        let resp = parse(
            r#"{ "candidates": [{ "content": { "parts": [{}] } }] }"#,
        );
        assert!(matches!(
            resp.interpret().unwrap_err(),
            ForgeError::EmptyResponse
        ));
    }

    #[test]
    fn test_result_image_round_trip() {
        use base64::Engine;

        let bytes: Vec<u8> = (0u8..=255).collect();
        let image = ResultImage {
            mime_type: "image/png".into(),
            base64_data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        };
        assert_eq!(image.decode().unwrap(), bytes);
    }

    #[test]
    fn test_save_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let image = ResultImage {
            mime_type: "image/png".into(),
            base64_data: "iVBORw0KGgo=".into(),
        };
        image.save(&path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, image.decode().unwrap());
    }
}
