//! Texts shown to the agent when a call is blocked or flagged.

use chrono::NaiveDate;

/// Block reason for an `add_memory` without `source_description`.
pub fn missing_source(today: NaiveDate) -> String {
    format!(
        "Source required: source_description is missing.\n\n\
         Where does this knowledge come from?\n\
         - Direct user statement -> source_description: 'User statement {today}'\n\
         - External research -> source_description: '<URL or book reference>'\n\
         - Own derived insight -> source_description: 'Own inference'\n\n\
         Knowledge without a source contaminates the graph."
    )
}

/// Block reason listing the credential terms found in the body.
pub fn credentials_detected(terms: &[&str]) -> String {
    format!(
        "Credentials detected: episode_body mentions {}.\n\n\
         Credentials belong in:\n\
         - a password manager\n\
         - a secrets manager\n\
         - environment variables\n\n\
         Never store them in the knowledge graph.",
        terms.join(", ")
    )
}

/// Block reason asking for a deliberate resubmission to the default group.
pub fn confirm_default_group(name: &str, group_id: &str) -> String {
    format!(
        "Confirm write to '{group_id}': '{name}' has no project group_id.\n\n\
         '{group_id}' holds long-lived knowledge shared by every project. Before writing, answer:\n\
         1. Transferability: would this help in a different project?\n\
         2. Abstraction: is it a principle, or an implementation detail of this codebase?\n\
         3. Relevance: will it still matter in five years?\n\n\
         If all three hold, generalize the entry and re-issue the same add_memory call \
         with the same name. Otherwise pass a project group_id."
    )
}

/// Advisory for a confirmed write whose body did not change.
pub fn unchanged_resubmission(name: &str, group_id: &str) -> String {
    format!(
        "'{name}' was written to '{group_id}' unchanged. The entry was approved, but it was \
         not generalized after the confirmation prompt; check that it reads as a principle \
         rather than a project detail."
    )
}

/// Block reason for `clear_graph` before a review search.
pub fn review_required(default_group_id: &str) -> String {
    format!(
        "Review required before clear_graph.\n\n\
         Before clearing, always:\n\
         1. search_nodes(entity_types=['Learning', 'Decision', 'Concept'])\n\
         2. Promote valuable knowledge to '{default_group_id}'\n\
         3. Then clear_graph\n\n\
         After clear_graph the project knowledge is gone; this cannot be undone."
    )
}
