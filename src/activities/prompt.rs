//! Summarization prompt.

use super::categories::SEED_CATEGORIES;
use crate::models::Post;
use itertools::Itertools;

/// Build the prompt for one post.
///
/// The model is asked for `|Summary: <text>|Categories: <a>, <b>, <c>|`,
/// picking from the seed vocabulary or proposing its own names.
pub fn activity_prompt(post: &Post) -> String {
    let options = SEED_CATEGORIES
        .iter()
        .map(|(name, _)| format!("- {name}"))
        .join(",");
    format!(
        "Title: {title}\n\
         Content: {content}\n\
         \n\
         You are a political commentator or analyst, summarize the post and select only 3 \
         categories from the following options the post rightly belongs to: {options}, \
         - Other (Please specify);\n\
         \n\
         The output should be in this form: |Summary: string|Categories: string, string, string|",
        title = post.title,
        content = post.content,
    )
}
