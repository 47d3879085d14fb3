//! AI context blocks and prompt composition.

use serde::{Deserialize, Serialize};

use crate::language::LanguageTag;
use crate::python_context::{analyze, format_for_prompt};

/// Markdown context block for one file.
///
/// Python files get a structural summary ahead of the fenced source.
pub fn file_context(filename: &str, code: &str) -> String {
    let language = LanguageTag::classify(filename);
    match language {
        LanguageTag::Python => format!(
            "\n# Python Context for {}\n{}\n\n# Code\n```{}\n{}\n```",
            filename,
            format_for_prompt(&analyze(code)),
            language.fence(),
            code
        ),
        _ => format!("\n# {}\n```{}\n{}\n```", filename, language.fence(), code),
    }
}

/// A question about a selection in an open file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub question: String,
    /// Identifier of the editor tab the selection came from
    pub tab_id: String,
    pub selection: String,
    pub filename: String,
    pub code: String,
}

/// Assemble the full prompt: question, selection, file context, project skeleton
pub fn compose_prompt(request: &PromptRequest, project_map: &str) -> String {
    let prompt = format!(
        "\n# Question\n{question}\n\n\
         # Selected Code ({tab})\n```\n{selection}\n```\n\n\
         # Full File Context\n{file}\n\n\
         # Project Skeleton\n```\n{map}\n```\n",
        question = request.question,
        tab = request.tab_id,
        selection = request.selection,
        file = file_context(&request.filename, &request.code),
        map = project_map,
    );
    prompt.trim().to_string()
}
