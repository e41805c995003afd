//! Function declarations sent with every Gemini request.

use journal_core::assistant::UPDATE_DIARY_TOOL;
use journal_core::diary::Mood;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// `tools[]` element of a `generateContent` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

/// OpenAPI-subset schema understood by Gemini.
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    fn string(description: &str) -> Self {
        Self {
            kind: "STRING",
            description: Some(description.to_string()),
            enum_values: Vec::new(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    fn object(properties: BTreeMap<String, Schema>, required: &[&str]) -> Self {
        Self {
            kind: "OBJECT",
            description: None,
            enum_values: Vec::new(),
            properties,
            required: required.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Declaration of `updateDiary(date, content, mood?)`.
pub fn update_diary_declaration() -> FunctionDeclaration {
    let moods: Vec<String> = Mood::iter().map(|mood| mood.to_string()).collect();

    let mut mood = Schema::string(&format!(
        "The mood associated with this entry. Options: {}.",
        moods.join(", ")
    ));
    mood.enum_values = moods;

    let properties = BTreeMap::from([
        (
            "date".to_string(),
            Schema::string("The date of the diary entry in YYYY-MM-DD format."),
        ),
        (
            "content".to_string(),
            Schema::string(
                "The full text content of the diary entry. It should be written in a diary \
                 style (first person). If there is existing content for this day, merge the \
                 new information naturally.",
            ),
        ),
        ("mood".to_string(), mood),
    ]);

    FunctionDeclaration {
        name: UPDATE_DIARY_TOOL.to_string(),
        description: "Creates or updates the diary entry for a specific date. Use this when the \
                      user wants to record an event, thought, or feeling into their journal."
            .to_string(),
        parameters: Schema::object(properties, &["date", "content"]),
    }
}

/// The tool list of every request.
pub fn diary_tools() -> Vec<Tool> {
    vec![Tool {
        function_declarations: vec![update_diary_declaration()],
    }]
}
