use common::{Choice, PageWindow};
use serde::Serialize;

/// Pagination metadata included in paginated list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 15)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 4)]
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<PageWindow> for Pagination {
    fn from(w: PageWindow) -> Self {
        Self {
            page: w.page,
            per_page: w.per_page,
            total: w.total,
            total_pages: w.total_pages,
            has_next: w.has_next(),
            has_previous: w.has_previous(),
        }
    }
}

/// One selectable value of an enumerated field.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ChoiceOption {
    /// Value to submit.
    #[schema(example = "S")]
    pub value: String,
    /// Text to show.
    #[schema(example = "small")]
    pub label: String,
}

impl ChoiceOption {
    pub fn all<T: Choice>() -> Vec<Self> {
        T::ALL
            .iter()
            .map(|c| Self {
                value: c.code().to_string(),
                label: c.label().to_string(),
            })
            .collect()
    }
}

/// A referenced row offered in a select widget.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RowOption {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Pekiness")]
    pub name: String,
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// GLOB pattern matching any text that contains `term`, ignoring case.
///
/// Every letter becomes a class of its case forms (`ñ` → `[ñÑ]`), so the
/// match folds non-ASCII letters too. GLOB metacharacters match literally.
pub fn glob_contains(term: &str) -> String {
    let mut pattern = String::from("*");
    for c in term.chars() {
        match c {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            _ => {
                let forms = case_forms(c);
                if forms.len() == 1 {
                    pattern.push(c);
                } else {
                    pattern.push('[');
                    pattern.extend(forms);
                    pattern.push(']');
                }
            }
        }
    }
    pattern.push('*');
    pattern
}

/// `c` and its single-character lower and upper case forms.
fn case_forms(c: char) -> Vec<char> {
    fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
        let first = mapped.next()?;
        mapped.next().is_none().then_some(first)
    }

    let mut forms = vec![c];
    for form in [single(c.to_lowercase()), single(c.to_uppercase())]
        .into_iter()
        .flatten()
    {
        if !forms.contains(&form) {
            forms.push(form);
        }
    }
    forms
}

/// Trimmed search term, or `None` when the parameter is absent or blank.
pub fn search_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
