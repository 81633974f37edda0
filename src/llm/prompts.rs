//! Prompts for the three analysis pipelines.
//!
//! All of them ask for the same `## N. Title` layout so responses can be
//! split and scored the same way.

const SCORING_GUIDANCE: &str = "For scoring, do not be afraid to give a good score. Sometimes no issues will be found. If there are issues give an appropriate score to reflect those.";

/// Balanced structure-and-logic review of a diagram image.
pub const VISION_PROMPT: &str = concat!(
    "You are an expert Senior Database Engineer.\n",
    "Analyze this ER diagram image.\n",
    "Ignore watermark text or software UI noise.\n\n",
    "For scoring, do not be afraid to give a good score. Sometimes no issues will be found. If there are issues give an appropriate score to reflect those.\n\n",
    "OUTPUT FORMAT (Strictly use these Markdown headers):\n\n",
    "## 1. Overview\n",
    "(1-2 sentences on what the diagram represents)\n\n",
    "## 2. Entities & Attributes\n",
    "(List detected entities and attributes. Use dashes '-' for lists.)\n\n",
    "## 3. Relationships\n",
    "(List connections between entities. Use dashes '-' for lists.)\n\n",
    "## 4. Issues\n",
    "(List logical database design issues, e.g., missing keys, bad cardinality. Do NOT mention OCR noise. It is not necessary to find issues if there are none.)\n\n",
    "## 5. Suggestions\n",
    "(Concrete fixes for the issues)\n\n",
    "## 6. Score\n",
    "Score: NN/100\n",
    "(Brief justification)\n",
);

/// Exhaustive extraction of entities and relationships from a diagram image.
pub const EXTRACTION_PROMPT: &str = concat!(
    "You are a Database Architect specializing in Reverse Engineering.\n",
    "Extract every detail from this ER diagram image into a formal report.\n\n",
    "For scoring, do not be afraid to give a good score. Sometimes no issues will be found. If there are issues give an appropriate score to reflect those.\n\n",
    "OUTPUT FORMAT (Strictly use these Markdown headers):\n\n",
    "## 1. Overview\n",
    "(Brief summary of the domain)\n\n",
    "## 2. Entities & Attributes\n",
    "(List EVERY entity and ALL its attributes found in the image. Be exhaustive.)\n\n",
    "## 3. Relationships\n",
    "(List every line connecting boxes, including cardinality labels like '1', 'N', 'M' if visible.)\n\n",
    "## 4. Issues\n",
    "(Critique the design: are Primary Keys marked? Are relationships named? Issues are not necessary to be found if there are none.)\n\n",
    "## 5. Suggestions\n",
    "(How to make this diagram professional)\n\n",
    "## 6. Score\n",
    "Score: NN/100\n",
    "(Brief justification)\n",
);

/// Review of noisy OCR text. `{ocr_text}` is replaced with the scanned lines.
pub const OCR_PROMPT_TEMPLATE: &str = r#"You are an expert Senior Database Engineer acting as a Data Cleaner.
You have been given raw, dirty OCR text from an Entity Relationship Diagram (ERD).
The OCR text contains significant 'hallucinations' (gibberish words, random characters, misread labels).

{scoring}

RAW OCR DATA:
{ocr_text}

### STRICT INSTRUCTIONS:
1. **AGGRESSIVE FILTERING**: Before analyzing, mentally delete any text that does not look like a valid English word, a standard database abbreviation (e.g., PK, FK, ID), or a plausible variable name.
   - Example: 'Checynll', 'Haptd', 'Hadidid', 'Habitnmm' -> IGNORE THESE COMPLETELY.
   - Example: 'User', 'Student', 'enroll_date' -> KEEP THESE.
2. **NO GIBBERISH IN OUTPUT**: Never repeat a filtered word in your report, not even to point out that it is unreadable.
3. **INFER CONTEXT**: If you see 'Studnt', correct it to 'Student'. If you see 'Primry Key', treat it as 'Primary Key'.
4. **OUTPUT FORMAT**: Use Markdown headers (##) and bullet points (-).

### OUTPUT SECTIONS:

## 1. Overview
(1-2 sentences on what the Valid parts of the diagram represent)

## 2. Entities & Attributes
(List ONLY the valid, real entities you detected. Correct spelling errors if obvious.)
- **EntityName**: Attribute1, Attribute2, ...

## 3. Relationships
(List valid relationships between the real entities)
- EntityA connects to EntityB (Type if known)

## 4. Issues
(List ONLY logical database issues like missing keys or bad cardinality. DO NOT mention OCR typos or gibberish words here. Do not need to find issues if there are none.)

## 5. Suggestions
(Standard database improvements)

## 6. Score
Score: NN/100
(Brief justification)
"#;

/// Build the OCR text prompt around the scanned text.
pub fn ocr_prompt(ocr_text: &str) -> String {
    OCR_PROMPT_TEMPLATE
        .replace("{scoring}", SCORING_GUIDANCE)
        .replace("{ocr_text}", ocr_text)
}
