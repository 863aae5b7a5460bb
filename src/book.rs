use serde::{Deserialize, Serialize};

/// A book as stored by the editor: metadata, optional front/back matter and
/// the ordered chapters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_page: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    /// Broad kind of book ("novel", "cookbook", ...), used in prompts.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub book_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credits: Vec<Credit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateRef>,
    /// Keys the editor stores that layout does not use (`id`, `coverImageUrl`, ...),
    /// kept so a rewritten book file loses nothing.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A contributor line on the credits page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub name: String,
}

/// The editor stores a template id; expanded templates are accepted inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateRef {
    Id(String),
    Inline(BookTemplate),
}

impl TemplateRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Inline(template) => &template.id,
        }
    }

    /// Cover and structure hints, only known for inline templates.
    pub fn details(&self) -> Option<&BookTemplate> {
        match self {
            Self::Id(_) => None,
            Self::Inline(template) => Some(template),
        }
    }
}

/// Structural template a book was started from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cover_suggestion: Option<String>,
    #[serde(default)]
    pub structure: Vec<TemplateSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Book {
    pub fn new(title: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            ..Self::default()
        }
    }

    /// Cover text, if present and not blank.
    pub fn cover_text(&self) -> Option<&str> {
        non_blank(self.cover_page.as_deref())
    }

    /// Credits text, if present and not blank.
    pub fn credits_text(&self) -> Option<&str> {
        non_blank(self.credits_page.as_deref())
    }

    /// Credits with both a role and a name, formatted one per line.
    pub fn credit_lines(&self) -> Vec<String> {
        self.credits
            .iter()
            .filter(|c| !c.role.trim().is_empty() && !c.name.trim().is_empty())
            .map(|c| format!("{}: {}", c.role, c.name))
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_editor_json() {
        let json = r#"{
            "title": "Tides",
            "genre": "Fantasy",
            "description": "A sea story",
            "coverPage": "Tides\nA novel",
            "chapters": [{"title": "One", "content": "Hello"}],
            "colorScheme": "fantasy",
            "type": "novel",
            "credits": [{"role": "Author", "name": "R. Vane"}]
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.title, "Tides");
        assert_eq!(book.cover_text(), Some("Tides\nA novel"));
        assert_eq!(book.color_scheme.as_deref(), Some("fantasy"));
        assert_eq!(book.book_type.as_deref(), Some("novel"));
        assert_eq!(book.chapters.len(), 1);
    }

    #[test]
    fn template_id_string_loads() {
        let book: Book =
            serde_json::from_str(r#"{"title":"T","template":"novel-classic"}"#).unwrap();
        let template = book.template.unwrap();
        assert_eq!(template, TemplateRef::Id("novel-classic".into()));
        assert_eq!(template.id(), "novel-classic");
        assert!(template.details().is_none());
    }

    #[test]
    fn inline_template_loads_with_details() {
        let json = r#"{"template":{"id":"cookbook","coverSuggestion":"a kitchen table",
            "structure":[{"title":"Soups","description":"warm starters"}]}}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        let template = book.template.unwrap();
        assert_eq!(template.id(), "cookbook");
        let details = template.details().unwrap();
        assert_eq!(details.cover_suggestion.as_deref(), Some("a kitchen table"));
        assert_eq!(details.structure[0].title, "Soups");
    }

    #[test]
    fn unknown_editor_keys_survive_a_rewrite() {
        let json = r#"{"id":"b1","title":"T","genre":"G","description":"d",
            "coverImageUrl":"http://x/c.png","chapters":[],"template":"novel-classic"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.extra.len(), 2);

        let saved: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&book).unwrap()).unwrap();
        assert_eq!(saved["id"], "b1");
        assert_eq!(saved["coverImageUrl"], "http://x/c.png");
        assert_eq!(saved["template"], "novel-classic");
        assert_eq!(serde_json::from_value::<Book>(saved).unwrap(), book);
    }

    #[test]
    fn blank_optional_text_is_absent() {
        let mut book = Book::new("T", "G");
        book.cover_page = Some("   \n".into());
        assert!(book.cover_text().is_none());
        assert!(book.credits_text().is_none());
    }

    #[test]
    fn credit_lines_skip_incomplete_entries() {
        let mut book = Book::new("T", "G");
        book.credits = vec![
            Credit {
                role: "Editor".into(),
                name: "Ann".into(),
            },
            Credit {
                role: "".into(),
                name: "Ghost".into(),
            },
        ];
        assert_eq!(book.credit_lines(), vec!["Editor: Ann".to_string()]);
    }
}
