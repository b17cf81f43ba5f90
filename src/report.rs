const FINAL_BANNER: &str = "--- FINAL RESPONSE ---";
const RULE: &str = "----------------------";

/// Console block for a finished run: banner, answer, response id.
pub fn render_answer(answer: &str, response_id: &str) -> String {
    format!(
        "{FINAL_BANNER}\n{}\n{RULE}\nresponse id: {response_id}",
        answer.trim()
    )
}
