//! Prompt text for each rung of the generation ladder.

use super::{BookBrief, ItemKind};

const NO_CREDITS: &str = "Author: Anonymous";

/// Full prompt, used for the first attempt.
pub fn primary(brief: &BookBrief, kind: ItemKind, title: &str, description: Option<&str>) -> String {
    match kind {
        ItemKind::Cover => {
            let mut prompt = format!(
                "Create a cover page for a {} book titled \"{}\" in the {} category. This book is about: {}. Format the response as plain text with a simple structure. No markdown formatting.",
                brief.book_type, brief.title, brief.category, brief.description
            );
            if let Some(suggestion) = brief
                .template
                .as_ref()
                .and_then(|t| t.cover_suggestion.as_deref())
                .filter(|s| !s.trim().is_empty())
            {
                prompt.push_str(&format!(" Consider the following design concept: {suggestion}."));
            }
            prompt
        }
        ItemKind::Chapter => {
            let mut prompt = format!(
                "Write a detailed chapter titled \"{title}\" for a {} book titled \"{}\" in the {} category.",
                brief.book_type, brief.title, brief.category
            );
            if let Some(description) = non_blank(description) {
                prompt.push_str(&format!(" This chapter covers: {description}."));
            }
            prompt.push_str(&format!(" The book overall is about: {}.", brief.description));

            if let Some(section) = brief
                .template
                .as_ref()
                .and_then(|t| t.structure.iter().find(|s| s.title == title))
            {
                prompt.push_str(&format!(
                    " According to the book structure, this chapter should focus on: {}.",
                    section.description
                ));
            }
            prompt.push_str(&format!(
                " Make it engaging, appropriate for the {} genre, and at least 500 words in length. Format the response as plain text with proper paragraphs. No markdown formatting.",
                brief.book_type
            ));
            prompt
        }
        ItemKind::Credits => format!(
            "Create a credits page for a {} book titled \"{}\". Include the following contributors:\n{}\n\nFormat it as plain text with a simple structure. No markdown formatting.",
            brief.book_type,
            brief.title,
            credits_list(brief)
        ),
    }
}

/// Shorter prompt for the retry after a failed first attempt.
pub fn simplified(brief: &BookBrief, kind: ItemKind, title: &str) -> String {
    match kind {
        ItemKind::Cover => format!(
            "Create a simple cover page for \"{}\". Just include the title, genre, and a brief subtitle. Format as plain text, no markdown.",
            brief.title
        ),
        ItemKind::Chapter => format!(
            "Write a brief chapter titled \"{title}\" for the book \"{}\". Keep it simple but engaging, about 250 words. Format as plain text, no markdown.",
            brief.title
        ),
        ItemKind::Credits => format!(
            "Create a simple credits page for \"{}\". Include:\n{}\nFormat as plain text, no markdown.",
            brief.title,
            credits_list(brief)
        ),
    }
}

/// Text built from the book data alone, used when every request failed.
pub fn fallback_text(
    brief: &BookBrief,
    kind: ItemKind,
    title: &str,
    description: Option<&str>,
) -> String {
    match kind {
        ItemKind::Cover => format!(
            "{}\n\nA {} book in the {} category\n\n{}",
            brief.title, brief.book_type, brief.category, brief.description
        ),
        ItemKind::Chapter => format!(
            "{title}\n\nThis chapter was meant to cover: {}.\n\nPlease try regenerating this content.",
            non_blank(description).unwrap_or("various aspects of the book")
        ),
        ItemKind::Credits => format!("Credits\n\n{}", credits_list(brief)),
    }
}

fn credits_list(brief: &BookBrief) -> String {
    if brief.credits.is_empty() {
        NO_CREDITS.to_string()
    } else {
        brief.credits.join("\n")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
