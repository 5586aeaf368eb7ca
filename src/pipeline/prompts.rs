//! Prompt templates for each pipeline stage
//!
//! `{schema}` is replaced with the active parameter table; the stage input
//! placeholder is replaced last so user text can never inject a schema.

pub const SCHEMA_PLACEHOLDER: &str = "{schema}";
pub const USER_INPUT_PLACEHOLDER: &str = "{user_input}";
pub const INTENT_PLACEHOLDER: &str = "{intent_analysis}";
pub const INSTRUCTIONS_PLACEHOLDER: &str = "{instructions}";

/// Stage 1: what does the user want to change?
pub const INTENT_ANALYSIS_PROMPT: &str = r#"You are an assistant that interprets natural language commands for a VRM avatar.
Work out which avatar parameters the user wants to change.

Use only these parameter categories and names (value ranges in brackets):

{schema}
USER INPUT: "{user_input}"

Output the intent as JSON only, for example:
{
  "intent": "change model parameters",
  "parameters": [
    {
      "category": "pose",
      "name": "headRotationY",
      "value": 0.5,
      "confidence": 0.9
    }
  ],
  "feedback": "Turning the head to the right."
}
"#;

/// Stage 2: turn the analyzed intent into concrete instructions
pub const INSTRUCTION_GENERATION_PROMPT: &str = r#"You are an assistant that writes concrete instructions for a VRM avatar.
Based on the analyzed intent below, produce specific parameter instructions.

Available parameters:

{schema}
ANALYZED INTENT:
{intent_analysis}

Output JSON only, in this format:
{
  "instructions": [
    {
      "category": "pose",
      "name": "headRotationY",
      "value": 0.5,
      "description": "Rotate the head 30 degrees to the right"
    }
  ],
  "feedback": "Turned the head to the right. Anything else to adjust?"
}
"#;

/// Stage 3: reduce instructions to the internal parameter query
pub const QUERY_CONVERSION_PROMPT: &str = r#"You are an assistant that converts avatar instructions into parameter queries.
Convert the instructions below into the query used internally by the system.
Values must stay inside the listed ranges:

{schema}
INSTRUCTIONS:
{instructions}

Output JSON only, in this format:
{
  "parameters": [
    {
      "category": "pose",
      "name": "headRotationY",
      "value": 0.5
    }
  ],
  "feedback": "Turned the head to the right. Anything else to adjust?"
}
"#;

/// Single-shot mode: straight from user text to a parameter array
pub const DIRECT_CONVERSION_PROMPT: &str = r#"You adjust the parameters of a VRM avatar.
Based on the user's instruction, always return JSON in exactly this form, with no other explanation:

[
  {
    "category": "pose" | "face" | "material",
    "name": string,
    "value": number
  }
]

Available parameters:

{schema}
Examples:
Input: "make it smile"
Output: [{"category": "face", "name": "happy", "value": 1.0}]

Input: "raise your right hand"
Output: [{"category": "pose", "name": "rightArmRotationX", "value": -0.5}]

Input: "look sad"
Output: [{"category": "face", "name": "sad", "value": 0.8}]

Notes:
- Return only JSON in the format above
- Keep every value inside its listed range
- Several parameters may be combined
- Do not put any text before or after the JSON

USER INSTRUCTION: {user_input}
"#;

/// Fill a template: schema first, then the stage input
pub fn render(template: &str, schema_text: &str, placeholder: &str, input: &str) -> String {
    template
        .replace(SCHEMA_PLACEHOLDER, schema_text)
        .replace(placeholder, input)
}
